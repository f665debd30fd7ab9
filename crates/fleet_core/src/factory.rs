//! Creation by type tag, and the fixed figures of every vessel design.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, Engagement, Evasion, OutOfRange, Shuttle, Skimming, Tour};
use crate::error::{FleetError, Result};
use crate::navigation::Point;
use crate::types::VesselId;
use crate::vessel::{Vessel, VesselSpec};

const TANKER_CARGO_CAPACITY: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VesselKind {
    CruiseShip,
    Tanker,
    Skimmer,
    Cruiser,
    TorpedoBoat,
}

impl VesselKind {
    pub const ALL: [VesselKind; 5] = [
        VesselKind::CruiseShip,
        VesselKind::Tanker,
        VesselKind::Skimmer,
        VesselKind::Cruiser,
        VesselKind::TorpedoBoat,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::CruiseShip => "Cruise_ship",
            Self::Tanker => "Tanker",
            Self::Skimmer => "Skimmer",
            Self::Cruiser => "Cruiser",
            Self::TorpedoBoat => "Torpedo_boat",
        }
    }

    pub fn spec(self) -> VesselSpec {
        let (fuel_capacity, maximum_speed, fuel_consumption, resistance) = match self {
            Self::CruiseShip => (500.0, 15.0, 2.0, 0),
            Self::Tanker => (100.0, 10.0, 2.0, 0),
            Self::Skimmer => (100.0, 2.0, 0.5, 0),
            Self::Cruiser => (1000.0, 20.0, 10.0, 6),
            Self::TorpedoBoat => (800.0, 12.0, 5.0, 9),
        };
        VesselSpec {
            fuel_capacity,
            maximum_speed,
            fuel_consumption,
            resistance,
        }
    }

    pub fn behavior(self) -> Behavior {
        match self {
            Self::CruiseShip => Behavior::Touring(Tour::default()),
            Self::Tanker => Behavior::CargoShuttle(Shuttle::new(TANKER_CARGO_CAPACITY)),
            Self::Skimmer => Behavior::SpillCleanup(Skimming::default()),
            Self::Cruiser => Behavior::RangedCombat(Engagement::new(3, 15.0, OutOfRange::Disengage)),
            Self::TorpedoBoat => Behavior::EvasiveCombat {
                engagement: Engagement::new(3, 5.0, OutOfRange::Pursue),
                evasion: Evasion::new(15.0),
            },
        }
    }
}

/// What a type tag asks to be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blueprint {
    Vessel(VesselKind),
    Group,
}

impl FromStr for Blueprint {
    type Err = FleetError;

    fn from_str(tag: &str) -> Result<Self> {
        let blueprint = match tag.to_ascii_lowercase().as_str() {
            "cruise_ship" | "touring" => Self::Vessel(VesselKind::CruiseShip),
            "tanker" | "cargo" => Self::Vessel(VesselKind::Tanker),
            "skimmer" | "cleanup" => Self::Vessel(VesselKind::Skimmer),
            "cruiser" | "ranged" => Self::Vessel(VesselKind::Cruiser),
            "torpedo_boat" | "evasive" => Self::Vessel(VesselKind::TorpedoBoat),
            "group" => Self::Group,
            _ => return Err(FleetError::UnknownType(tag.to_string())),
        };
        Ok(blueprint)
    }
}

impl FromStr for VesselKind {
    type Err = FleetError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag.parse::<Blueprint>()? {
            Blueprint::Vessel(kind) => Ok(kind),
            Blueprint::Group => Err(FleetError::UnknownType(tag.to_string())),
        }
    }
}

pub fn create_vessel(name: &str, type_tag: &str, location: Point) -> Result<Vessel> {
    let kind: VesselKind = type_tag.parse()?;
    Ok(Vessel::new(kind, VesselId(name.to_string()), location))
}

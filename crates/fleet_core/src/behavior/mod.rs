//! Per-type autonomous behavior layered over a [`Hull`].
//!
//! Each variant owns its private state machine. Any externally issued
//! navigation command cancels the active behavior before the hull moves.

mod cargo;
mod cleanup;
mod combat;
mod evasion;
mod touring;

pub use cargo::{Haul, Shuttle};
pub use cleanup::{Skimming, Sweep};
pub use combat::{Engagement, OutOfRange};
pub use evasion::{retreat_depot, Evasion};
pub use touring::{Leg, Tour};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::depot::DepotTable;
use crate::navigation::Point;
use crate::types::{Outbox, VesselId};
use crate::vessel::Hull;

/// Optional command families a vessel may or may not offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Tour,
    Cargo,
    Skim,
    Attack,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tour => "tour depots",
            Self::Cargo => "carry cargo",
            Self::Skim => "skim spills",
            Self::Attack => "attack",
        })
    }
}

/// What one vessel currently knows about another.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: VesselId,
    pub location: Point,
    pub afloat: bool,
}

impl Contact {
    pub fn of(hull: &Hull) -> Self {
        Self {
            id: hull.id().clone(),
            location: hull.location(),
            afloat: hull.is_afloat(),
        }
    }
}

/// A shot fired during a tick, resolved by the world against `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volley {
    pub target: VesselId,
    pub force: i32,
}

/// Depots and notification queue a behavior may touch while it runs.
pub struct Context<'a> {
    pub depots: &'a mut DepotTable,
    pub outbox: &'a mut Outbox,
}

#[derive(Debug, Clone)]
pub enum Behavior {
    None,
    Touring(Tour),
    CargoShuttle(Shuttle),
    SpillCleanup(Skimming),
    RangedCombat(Engagement),
    EvasiveCombat {
        engagement: Engagement,
        evasion: Evasion,
    },
}

impl Behavior {
    pub fn supports(&self, capability: Capability) -> bool {
        matches!(
            (self, capability),
            (Self::Touring(_), Capability::Tour)
                | (Self::CargoShuttle(_), Capability::Cargo)
                | (Self::SpillCleanup(_), Capability::Skim)
                | (
                    Self::RangedCombat(_) | Self::EvasiveCombat { .. },
                    Capability::Attack
                )
        )
    }

    /// Drops whatever the behavior was doing and returns it to idle.
    pub fn cancel(&mut self, vessel: &VesselId) {
        match self {
            Self::None => {}
            Self::Touring(tour) => tour.cancel(vessel),
            Self::CargoShuttle(shuttle) => shuttle.cancel(vessel),
            Self::SpillCleanup(skimming) => skimming.cancel(vessel),
            Self::RangedCombat(engagement) | Self::EvasiveCombat { engagement, .. } => {
                engagement.disengage(vessel);
            }
        }
    }

    pub fn engagement(&self) -> Option<&Engagement> {
        match self {
            Self::RangedCombat(engagement) | Self::EvasiveCombat { engagement, .. } => {
                Some(engagement)
            }
            _ => None,
        }
    }

    pub(crate) fn engagement_mut(&mut self) -> Option<&mut Engagement> {
        match self {
            Self::RangedCombat(engagement) | Self::EvasiveCombat { engagement, .. } => {
                Some(engagement)
            }
            _ => None,
        }
    }

    /// Runs one tick of the state machine after the hull has moved.
    pub(crate) fn update(
        &mut self,
        hull: &mut Hull,
        target: Option<&Contact>,
        ctx: &mut Context<'_>,
    ) -> Option<Volley> {
        match self {
            Self::None => None,
            Self::Touring(tour) => {
                tour.update(hull, ctx);
                None
            }
            Self::CargoShuttle(shuttle) => {
                shuttle.update(hull, ctx);
                None
            }
            Self::SpillCleanup(skimming) => {
                skimming.update(hull, ctx.outbox);
                None
            }
            Self::RangedCombat(engagement) | Self::EvasiveCombat { engagement, .. } => {
                engagement.update(hull, target, ctx.outbox)
            }
        }
    }

    /// Reaction to a hit the hull survived.
    pub(crate) fn on_hit(&mut self, hull: &mut Hull, attacker: &Contact, ctx: &mut Context<'_>) {
        match self {
            Self::RangedCombat(engagement) => engagement.counterattack(hull, attacker),
            Self::EvasiveCombat {
                engagement,
                evasion,
            } => evasion.take_evasive_action(hull, engagement, attacker, ctx),
            _ => {}
        }
    }

    pub fn describe(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Touring(tour) => Some(tour.describe()),
            Self::CargoShuttle(shuttle) => Some(shuttle.describe()),
            Self::SpillCleanup(skimming) => Some(skimming.describe()),
            Self::RangedCombat(engagement) | Self::EvasiveCombat { engagement, .. } => {
                Some(engagement.describe())
            }
        }
    }
}

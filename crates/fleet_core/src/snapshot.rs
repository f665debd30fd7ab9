use serde::{Deserialize, Serialize};

use crate::factory::VesselKind;
use crate::navigation::Point;
use crate::World;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotSnapshot {
    pub name: String,
    pub location: Point,
    pub fuel: f64,
    pub production_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselSnapshot {
    pub name: String,
    pub kind: Option<VesselKind>,
    pub location: Point,
    pub course: f64,
    pub speed: f64,
    pub fuel: f64,
    pub resistance: i32,
    pub group: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub name: String,
    pub members: Vec<String>,
    pub parent: Option<String>,
}

/// Serializable picture of the world at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: u64,
    pub depots: Vec<DepotSnapshot>,
    pub vessels: Vec<VesselSnapshot>,
    pub groups: Vec<GroupSnapshot>,
}

impl World {
    pub fn snapshot(&self) -> WorldSnapshot {
        let depots = self
            .depots()
            .values()
            .map(|depot| DepotSnapshot {
                name: depot.id().0.clone(),
                location: depot.location(),
                fuel: depot.fuel(),
                production_rate: depot.production_rate(),
            })
            .collect();

        let vessels = self
            .vessels()
            .map(|vessel| {
                let hull = vessel.hull();
                VesselSnapshot {
                    name: vessel.id().0.clone(),
                    kind: vessel.kind(),
                    location: hull.location(),
                    course: hull.course(),
                    speed: hull.speed(),
                    fuel: hull.fuel(),
                    resistance: hull.resistance(),
                    group: self.group_of(vessel.id().as_str()).map(str::to_string),
                    status: vessel.describe(),
                }
            })
            .collect();

        let groups = self
            .fleet()
            .group_names()
            .map(|name| GroupSnapshot {
                name: name.to_string(),
                members: self.members(name).unwrap_or_default(),
                parent: self.group_of(name).map(str::to_string),
            })
            .collect();

        WorldSnapshot {
            time: self.time(),
            depots,
            vessels,
            groups,
        }
    }
}

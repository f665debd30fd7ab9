//! Shared test fixtures for fleet_core and downstream crates.
//!
//! `harbor()` provides three depots in a triangle with fixed stock and no
//! production, so fuel accounting in tests is exact.

use crate::{Behavior, Depot, DepotId, Point, Vessel, VesselId, VesselKind, VesselSpec, World};

pub const ALPHA: &str = "Alpha";
pub const BRAVO: &str = "Bravo";
pub const CHARLIE: &str = "Charlie";

/// World with depots Alpha (0,0), Bravo (10,0) and Charlie (0,20).
pub fn harbor() -> World {
    let mut world = World::new();
    for (name, x, y) in [(ALPHA, 0.0, 0.0), (BRAVO, 10.0, 0.0), (CHARLIE, 0.0, 20.0)] {
        world
            .add_depot(Depot::new(DepotId::from(name), Point::new(x, y), 1000.0, 0.0))
            .expect("fixture depot");
    }
    world
}

/// Plain vessel: capacity 100, top speed 10, burns 2 per unit, no behavior.
pub fn plain_spec() -> VesselSpec {
    VesselSpec {
        fuel_capacity: 100.0,
        maximum_speed: 10.0,
        fuel_consumption: 2.0,
        resistance: 0,
    }
}

pub fn plain_vessel(name: &str, location: Point) -> Vessel {
    Vessel::custom(VesselId::from(name), location, plain_spec(), Behavior::None)
}

/// Adds a vessel of `kind` and returns its name for chaining.
pub fn launch(world: &mut World, kind: VesselKind, name: &str, x: f64, y: f64) -> String {
    world
        .add_vessel(Vessel::new(kind, VesselId::from(name), Point::new(x, y)))
        .expect("fixture vessel");
    name.to_string()
}

pub fn run_ticks(world: &mut World, ticks: u32) {
    for _ in 0..ticks {
        world.update();
    }
}

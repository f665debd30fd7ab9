use super::*;
use crate::behavior::{Haul, Leg, Sweep};
use crate::test_fixtures::{
    harbor, launch, plain_spec, plain_vessel, run_ticks, ALPHA, BRAVO, CHARLIE,
};

mod combat;
mod touring;

// --- Shared test helpers ------------------------------------------------

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {expected}, got {actual}"
    );
}

fn assert_at(world: &World, name: &str, x: f64, y: f64) {
    let location = vessel(world, name).location();
    assert_close(location.x, x);
    assert_close(location.y, y);
}

fn vessel<'a>(world: &'a World, name: &str) -> &'a Vessel {
    world.vessel(name).expect("vessel should exist")
}

fn depot(name: &str) -> DepotId {
    DepotId::from(name)
}

fn order(world: &mut World, target: &str, order: Order) -> Result<Dispatch> {
    world.issue(target, &order)
}

fn tour_leg(world: &World, name: &str) -> Leg {
    match vessel(world, name).behavior() {
        Behavior::Touring(tour) => tour.leg(),
        other => panic!("{name} is not touring: {other:?}"),
    }
}

fn haul(world: &World, name: &str) -> Haul {
    match vessel(world, name).behavior() {
        Behavior::CargoShuttle(shuttle) => shuttle.haul(),
        other => panic!("{name} is not a shuttle: {other:?}"),
    }
}

fn sweep(world: &World, name: &str) -> Sweep {
    match vessel(world, name).behavior() {
        Behavior::SpillCleanup(skimming) => skimming.sweep(),
        other => panic!("{name} is not a skimmer: {other:?}"),
    }
}

fn attacking(world: &World, name: &str) -> Option<String> {
    vessel(world, name).engaged_target().map(|id| id.0.clone())
}

//! `fleet_core` — vessel behavior engine and fleet composite.
//!
//! No IO. Time advances only through [`tick`] or [`World::update`], one hour
//! per call, and every update runs in a fixed name order.

pub mod behavior;
mod commands;
mod depot;
mod engine;
mod error;
mod factory;
mod fleet;
pub mod navigation;
mod observer;
mod snapshot;
mod types;
pub mod vessel;
mod world;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use behavior::{Behavior, Capability, Contact};
pub use commands::{Dispatch, FanOut, MemberOutcome};
pub use depot::{Depot, DepotTable};
pub use engine::{tick, CommandReport};
pub use error::{ErrorKind, FleetError, Result};
pub use factory::{create_vessel, Blueprint, VesselKind};
pub use fleet::{Fleet, Member, NodeKey};
pub use navigation::{CompassVector, Point};
pub use observer::{NotificationLog, Observer, ObserverId, SharedObserver};
pub use snapshot::{DepotSnapshot, GroupSnapshot, VesselSnapshot, WorldSnapshot};
pub use types::*;
pub use vessel::{HitOutcome, Hull, Movement, Vessel, VesselSpec};
pub use world::World;

#[cfg(test)]
mod tests;

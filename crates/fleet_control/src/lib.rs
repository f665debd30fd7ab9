//! Text command surface over a fleet_core [`World`](fleet_core::World).

mod controller;
mod directive;
mod error;

pub use controller::{Controller, Response};
pub use directive::{parse_directive, Directive};
pub use error::ControlError;

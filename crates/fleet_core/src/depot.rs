use std::collections::BTreeMap;

use crate::navigation::Point;
use crate::types::{DepotId, Notification, Outbox};

pub type DepotTable = BTreeMap<DepotId, Depot>;

/// A stationary fuel depot. Stock never goes negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Depot {
    id: DepotId,
    location: Point,
    fuel: f64,
    production_rate: f64,
}

impl Depot {
    pub fn new(id: DepotId, location: Point, fuel: f64, production_rate: f64) -> Self {
        Self {
            id,
            location,
            fuel: fuel.max(0.0),
            production_rate,
        }
    }

    pub fn id(&self) -> &DepotId {
        &self.id
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    pub fn production_rate(&self) -> f64 {
        self.production_rate
    }

    /// Hands out up to `request` units, limited by stock. Returns the amount given.
    pub fn provide_fuel(&mut self, request: f64) -> f64 {
        let supplied = request.clamp(0.0, self.fuel);
        self.fuel -= supplied;
        tracing::info!(depot = %self.id, supplied, remaining = self.fuel, "depot supplied fuel");
        supplied
    }

    pub fn accept_fuel(&mut self, amount: f64) {
        self.fuel += amount;
        tracing::info!(depot = %self.id, amount, stock = self.fuel, "depot accepted fuel");
    }

    pub fn update(&mut self) {
        if self.production_rate > 0.0 {
            self.fuel += self.production_rate;
            tracing::debug!(depot = %self.id, stock = self.fuel, "depot produced fuel");
        }
    }

    pub(crate) fn broadcast(&self, outbox: &mut Outbox) {
        outbox.push(Notification::Location {
            name: self.id.0.clone(),
            location: self.location,
        });
    }

    pub fn describe(&self) -> String {
        format!(
            "Depot {} at {}, fuel: {:.2} tons, production: {:.2}",
            self.id, self.location, self.fuel, self.production_rate
        )
    }
}

use std::collections::BTreeSet;

use crate::depot::{Depot, DepotTable};
use crate::error::{FleetError, Result};
use crate::navigation::{range_between, Point};
use crate::types::{DepotId, VesselId};
use crate::vessel::Hull;

use super::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Idle,
    EnRoute,
    Arriving,
    Resting,
    Departing,
}

/// Round trip through every depot, nearest unvisited first.
#[derive(Debug, Clone)]
pub struct Tour {
    leg: Leg,
    speed: f64,
    origin: Option<DepotId>,
    next_stop: Option<DepotId>,
    remaining: BTreeSet<DepotId>,
}

impl Default for Tour {
    fn default() -> Self {
        Self {
            leg: Leg::Idle,
            speed: 0.0,
            origin: None,
            next_stop: None,
            remaining: BTreeSet::new(),
        }
    }
}

impl Tour {
    pub fn leg(&self) -> Leg {
        self.leg
    }

    pub fn origin(&self) -> Option<&DepotId> {
        self.origin.as_ref()
    }

    pub fn next_stop(&self) -> Option<&DepotId> {
        self.next_stop.as_ref()
    }

    pub fn remaining(&self) -> impl Iterator<Item = &DepotId> {
        self.remaining.iter()
    }

    pub fn is_touring(&self) -> bool {
        self.leg != Leg::Idle
    }

    /// Sails for `origin` and plans a visit to every other depot.
    pub fn start(
        &mut self,
        hull: &mut Hull,
        origin: &DepotId,
        speed: f64,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        let depot = ctx
            .depots
            .get(origin)
            .ok_or_else(|| FleetError::UnknownEntity(origin.0.clone()))?;
        hull.check_underway(speed)?;
        self.cancel(hull.id());
        hull.set_destination_depot_and_speed(depot, speed, ctx.outbox)?;

        self.remaining = ctx.depots.keys().filter(|id| *id != origin).cloned().collect();
        self.origin = Some(origin.clone());
        self.next_stop = Some(origin.clone());
        self.speed = speed;
        self.leg = Leg::EnRoute;
        tracing::info!(vessel = %hull.id(), origin = %origin, stops = self.remaining.len(), "tour started");
        Ok(())
    }

    pub fn cancel(&mut self, vessel: &VesselId) {
        if self.is_touring() {
            tracing::info!(vessel = %vessel, "cruise cancelled");
        }
        *self = Self::default();
    }

    pub(crate) fn update(&mut self, hull: &mut Hull, ctx: &mut Context<'_>) {
        if !self.is_touring() {
            return;
        }
        if !hull.can_move() {
            self.cancel(hull.id());
            return;
        }
        let outcome = match self.leg {
            Leg::Idle => Ok(()),
            Leg::EnRoute => self.try_dock(hull, ctx),
            Leg::Arriving => {
                self.leg = Leg::Resting;
                hull.refuel(ctx.depots, ctx.outbox)
            }
            Leg::Resting => {
                self.leg = Leg::Departing;
                Ok(())
            }
            Leg::Departing => self.depart(hull, ctx),
        };
        if let Err(err) = outcome {
            tracing::warn!(vessel = %hull.id(), error = %err, "tour step failed");
            self.cancel(hull.id());
        }
    }

    fn try_dock(&mut self, hull: &mut Hull, ctx: &mut Context<'_>) -> Result<()> {
        let Some(next) = self.next_stop.clone() else {
            return Ok(());
        };
        let Some(depot) = ctx.depots.get(&next) else {
            return Err(FleetError::UnknownEntity(next.0));
        };
        if !hull.can_dock(depot) {
            return Ok(());
        }
        hull.dock(depot, ctx.outbox)?;
        if self.origin.as_ref() == Some(&next) && self.remaining.is_empty() {
            tracing::info!(vessel = %hull.id(), "cruise is over");
            *self = Self::default();
        } else {
            self.leg = Leg::Arriving;
        }
        Ok(())
    }

    fn depart(&mut self, hull: &mut Hull, ctx: &mut Context<'_>) -> Result<()> {
        let from = hull.location();
        let next = nearest(self.remaining.iter(), from, ctx.depots)
            .or_else(|| self.origin.clone())
            .ok_or_else(|| FleetError::CannotMove(hull.id().0.clone()))?;
        let depot = ctx
            .depots
            .get(&next)
            .ok_or_else(|| FleetError::UnknownEntity(next.0.clone()))?;
        hull.set_destination_depot_and_speed(depot, self.speed, ctx.outbox)?;
        self.remaining.remove(&next);
        tracing::info!(vessel = %hull.id(), next = %next, "cruise heading to next stop");
        self.next_stop = Some(next);
        self.leg = Leg::EnRoute;
        Ok(())
    }

    pub fn describe(&self) -> String {
        match (self.leg, &self.next_stop) {
            (Leg::Idle, _) => "Not cruising".to_string(),
            (Leg::EnRoute, Some(next)) => format!("On cruise to {next}"),
            (Leg::EnRoute, None) => "On cruise".to_string(),
            (Leg::Arriving | Leg::Resting | Leg::Departing, _) => {
                "Waiting during cruise".to_string()
            }
        }
    }
}

/// Closest depot to `from` among `candidates`; name order breaks ties.
fn nearest<'a>(
    candidates: impl Iterator<Item = &'a DepotId>,
    from: Point,
    depots: &DepotTable,
) -> Option<DepotId> {
    let mut best: Option<(&Depot, f64)> = None;
    for depot in candidates.filter_map(|id| depots.get(id)) {
        let range = range_between(from, depot.location());
        if best.map_or(true, |(_, best_range)| range < best_range) {
            best = Some((depot, range));
        }
    }
    best.map(|(depot, _)| depot.id().clone())
}

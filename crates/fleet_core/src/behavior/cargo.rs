use crate::depot::{Depot, DepotTable};
use crate::error::{FleetError, Result};
use crate::types::{DepotId, VesselId, FUEL_CLOSE_ENOUGH};
use crate::vessel::Hull;

use super::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haul {
    Unassigned,
    MovingToLoad,
    Loading,
    MovingToUnload,
    Unloading,
}

/// Endless load/unload cycle between two depots.
#[derive(Debug, Clone)]
pub struct Shuttle {
    haul: Haul,
    load: Option<DepotId>,
    unload: Option<DepotId>,
    cargo: f64,
    cargo_capacity: f64,
}

impl Shuttle {
    pub fn new(cargo_capacity: f64) -> Self {
        Self {
            haul: Haul::Unassigned,
            load: None,
            unload: None,
            cargo: 0.0,
            cargo_capacity,
        }
    }

    pub fn haul(&self) -> Haul {
        self.haul
    }

    pub fn cargo(&self) -> f64 {
        self.cargo
    }

    pub fn cargo_capacity(&self) -> f64 {
        self.cargo_capacity
    }

    pub fn load_depot(&self) -> Option<&DepotId> {
        self.load.as_ref()
    }

    pub fn unload_depot(&self) -> Option<&DepotId> {
        self.unload.as_ref()
    }

    pub fn set_load_destination(
        &mut self,
        hull: &mut Hull,
        depot: &DepotId,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        self.check_assignable(hull, depot, self.unload.as_ref())?;
        self.load = Some(depot.clone());
        tracing::info!(vessel = %hull.id(), depot = %depot, "will load at depot");
        self.start_cycle(hull, ctx)
    }

    pub fn set_unload_destination(
        &mut self,
        hull: &mut Hull,
        depot: &DepotId,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        self.check_assignable(hull, depot, self.load.as_ref())?;
        self.unload = Some(depot.clone());
        tracing::info!(vessel = %hull.id(), depot = %depot, "will unload at depot");
        self.start_cycle(hull, ctx)
    }

    /// Ends the cycle and forgets both depots. Cargo stays aboard.
    pub fn cancel(&mut self, vessel: &VesselId) {
        if self.haul != Haul::Unassigned || self.load.is_some() || self.unload.is_some() {
            tracing::info!(vessel = %vessel, "cargo cycle stopped");
        }
        self.load = None;
        self.unload = None;
        self.haul = Haul::Unassigned;
    }

    fn check_assignable(&self, hull: &Hull, depot: &DepotId, other: Option<&DepotId>) -> Result<()> {
        if self.haul != Haul::Unassigned {
            return Err(FleetError::CargoRouteActive(hull.id().0.clone()));
        }
        if other == Some(depot) {
            return Err(FleetError::InvalidRoute(depot.0.clone()));
        }
        // assigning the second depot starts the cycle, which needs a working hull
        if other.is_some() && !hull.can_move() {
            return Err(FleetError::CannotMove(hull.id().0.clone()));
        }
        Ok(())
    }

    fn start_cycle(&mut self, hull: &mut Hull, ctx: &mut Context<'_>) -> Result<()> {
        let (Some(load), Some(unload)) = (self.load.clone(), self.unload.clone()) else {
            return Ok(());
        };
        let load_depot = lookup(ctx.depots, &load)?;
        let unload_depot = lookup(ctx.depots, &unload)?;

        if hull.docked_depot() == Some(&load) {
            self.haul = Haul::Loading;
        } else if hull.docked_depot() == Some(&unload) {
            self.haul = Haul::Unloading;
        } else if !hull.is_moving() && self.cargo <= 0.0 && hull.can_dock(load_depot) {
            hull.dock(load_depot, ctx.outbox)?;
            self.haul = Haul::Loading;
        } else if !hull.is_moving() && self.cargo > 0.0 && hull.can_dock(unload_depot) {
            hull.dock(unload_depot, ctx.outbox)?;
            self.haul = Haul::Unloading;
        } else if self.cargo <= 0.0 {
            hull.set_destination_depot_and_speed(load_depot, hull.maximum_speed(), ctx.outbox)?;
            self.haul = Haul::MovingToLoad;
        } else {
            hull.set_destination_depot_and_speed(unload_depot, hull.maximum_speed(), ctx.outbox)?;
            self.haul = Haul::MovingToUnload;
        }
        tracing::info!(vessel = %hull.id(), haul = ?self.haul, "cargo cycle started");
        Ok(())
    }

    pub(crate) fn update(&mut self, hull: &mut Hull, ctx: &mut Context<'_>) {
        if self.haul == Haul::Unassigned {
            return;
        }
        let (Some(load), Some(unload)) = (self.load.clone(), self.unload.clone()) else {
            self.cancel(hull.id());
            return;
        };
        if !hull.can_move() {
            self.cancel(hull.id());
            return;
        }
        let outcome = match self.haul {
            Haul::Unassigned => Ok(()),
            Haul::MovingToLoad => self.dock_if_arrived(hull, &load, Haul::Loading, ctx),
            Haul::MovingToUnload => self.dock_if_arrived(hull, &unload, Haul::Unloading, ctx),
            Haul::Loading => self.load_step(hull, &load, &unload, ctx),
            Haul::Unloading => self.unload_step(hull, &load, &unload, ctx),
        };
        if let Err(err) = outcome {
            tracing::warn!(vessel = %hull.id(), error = %err, "cargo step failed");
            self.cancel(hull.id());
        }
    }

    fn dock_if_arrived(
        &mut self,
        hull: &mut Hull,
        target: &DepotId,
        then: Haul,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        let depot = lookup(ctx.depots, target)?;
        if hull.can_dock(depot) {
            hull.dock(depot, ctx.outbox)?;
            self.haul = then;
        }
        Ok(())
    }

    fn load_step(
        &mut self,
        hull: &mut Hull,
        load: &DepotId,
        unload: &DepotId,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        hull.refuel(ctx.depots, ctx.outbox)?;
        let needed = self.cargo_capacity - self.cargo;
        if needed < FUEL_CLOSE_ENOUGH {
            self.cargo = self.cargo_capacity;
            let depot = lookup(ctx.depots, unload)?;
            hull.set_destination_depot_and_speed(depot, hull.maximum_speed(), ctx.outbox)?;
            self.haul = Haul::MovingToUnload;
            return Ok(());
        }
        let depot = ctx
            .depots
            .get_mut(load)
            .ok_or_else(|| FleetError::UnknownEntity(load.0.clone()))?;
        self.cargo += depot.provide_fuel(needed);
        tracing::info!(vessel = %hull.id(), cargo = self.cargo, "loading cargo");
        Ok(())
    }

    fn unload_step(
        &mut self,
        hull: &mut Hull,
        load: &DepotId,
        unload: &DepotId,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        if self.cargo <= 0.0 {
            let depot = lookup(ctx.depots, load)?;
            hull.set_destination_depot_and_speed(depot, hull.maximum_speed(), ctx.outbox)?;
            self.haul = Haul::MovingToLoad;
            return Ok(());
        }
        let depot = ctx
            .depots
            .get_mut(unload)
            .ok_or_else(|| FleetError::UnknownEntity(unload.0.clone()))?;
        depot.accept_fuel(self.cargo);
        tracing::info!(vessel = %hull.id(), cargo = self.cargo, "unloaded cargo");
        self.cargo = 0.0;
        Ok(())
    }

    pub fn describe(&self) -> String {
        let activity = match self.haul {
            Haul::Unassigned => "no cargo destinations",
            Haul::MovingToLoad => "moving to loading destination",
            Haul::Loading => "loading",
            Haul::MovingToUnload => "moving to unloading destination",
            Haul::Unloading => "unloading",
        };
        format!("Cargo: {:.2} tons, {activity}", self.cargo)
    }
}

fn lookup<'d>(depots: &'d DepotTable, id: &DepotId) -> Result<&'d Depot> {
    depots
        .get(id)
        .ok_or_else(|| FleetError::UnknownEntity(id.0.clone()))
}

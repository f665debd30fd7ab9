//! A vessel is a [`Hull`] plus the [`Behavior`] its type provides.
//!
//! Command methods validate before touching state, so a rejected command
//! leaves the vessel exactly as it was.

mod hull;

pub use hull::{HitOutcome, Hull, Movement, VesselSpec};

use crate::behavior::{Behavior, Capability, Contact, Context, Volley};
use crate::depot::{Depot, DepotTable};
use crate::error::{FleetError, Result};
use crate::factory::VesselKind;
use crate::navigation::Point;
use crate::types::{DepotId, Outbox, VesselId};

#[derive(Debug, Clone)]
pub struct Vessel {
    kind: Option<VesselKind>,
    hull: Hull,
    behavior: Behavior,
}

impl Vessel {
    pub fn new(kind: VesselKind, id: VesselId, location: Point) -> Self {
        Self {
            kind: Some(kind),
            hull: Hull::new(id, location, kind.spec()),
            behavior: kind.behavior(),
        }
    }

    /// A vessel of no registered type, built from explicit figures.
    pub fn custom(id: VesselId, location: Point, spec: VesselSpec, behavior: Behavior) -> Self {
        Self {
            kind: None,
            hull: Hull::new(id, location, spec),
            behavior,
        }
    }

    // -----------------------------------------------------------------------
    // Readers
    // -----------------------------------------------------------------------

    pub fn id(&self) -> &VesselId {
        self.hull.id()
    }

    pub fn kind(&self) -> Option<VesselKind> {
        self.kind
    }

    pub fn hull(&self) -> &Hull {
        &self.hull
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn location(&self) -> Point {
        self.hull.location()
    }

    pub fn can_move(&self) -> bool {
        self.hull.can_move()
    }

    pub fn is_afloat(&self) -> bool {
        self.hull.is_afloat()
    }

    pub fn maximum_speed(&self) -> f64 {
        self.hull.maximum_speed()
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.behavior.supports(capability)
    }

    pub fn contact(&self) -> Contact {
        Contact::of(&self.hull)
    }

    pub fn engaged_target(&self) -> Option<&VesselId> {
        self.behavior.engagement().and_then(|e| e.target())
    }

    // -----------------------------------------------------------------------
    // Navigation commands
    // -----------------------------------------------------------------------

    pub fn set_course_and_speed(&mut self, course: f64, speed: f64, outbox: &mut Outbox) -> Result<()> {
        self.hull.check_underway(speed)?;
        self.behavior.cancel(self.hull.id());
        self.hull.set_course_and_speed(course, speed, outbox)
    }

    pub fn set_destination_position_and_speed(
        &mut self,
        point: Point,
        speed: f64,
        outbox: &mut Outbox,
    ) -> Result<()> {
        self.hull.check_underway(speed)?;
        self.behavior.cancel(self.hull.id());
        self.hull.set_destination_position_and_speed(point, speed, outbox)
    }

    /// For a touring vessel this starts a tour from `depot`.
    pub fn set_destination_depot_and_speed(
        &mut self,
        depot: &DepotId,
        speed: f64,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        if let Behavior::Touring(tour) = &mut self.behavior {
            return tour.start(&mut self.hull, depot, speed, ctx);
        }
        let target = find_depot(ctx.depots, depot)?;
        self.hull.check_underway(speed)?;
        self.behavior.cancel(self.hull.id());
        self.hull.set_destination_depot_and_speed(target, speed, ctx.outbox)
    }

    pub fn stop(&mut self, outbox: &mut Outbox) -> Result<()> {
        if !self.hull.can_move() {
            return Err(FleetError::CannotMove(self.hull.id().0.clone()));
        }
        self.behavior.cancel(self.hull.id());
        self.hull.stop(outbox)
    }

    pub fn dock(&mut self, depot: &DepotId, ctx: &mut Context<'_>) -> Result<()> {
        let target = find_depot(ctx.depots, depot)?;
        self.hull.dock(target, ctx.outbox)
    }

    pub fn refuel(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.hull.refuel(ctx.depots, ctx.outbox)
    }

    // -----------------------------------------------------------------------
    // Type-specific commands
    // -----------------------------------------------------------------------

    pub fn set_load_destination(&mut self, depot: &DepotId, ctx: &mut Context<'_>) -> Result<()> {
        find_depot(ctx.depots, depot)?;
        match &mut self.behavior {
            Behavior::CargoShuttle(shuttle) => shuttle.set_load_destination(&mut self.hull, depot, ctx),
            _ => Err(unsupported(&self.hull, Capability::Cargo)),
        }
    }

    pub fn set_unload_destination(&mut self, depot: &DepotId, ctx: &mut Context<'_>) -> Result<()> {
        find_depot(ctx.depots, depot)?;
        match &mut self.behavior {
            Behavior::CargoShuttle(shuttle) => shuttle.set_unload_destination(&mut self.hull, depot, ctx),
            _ => Err(unsupported(&self.hull, Capability::Cargo)),
        }
    }

    pub fn attack(&mut self, target: &Contact) -> Result<()> {
        let Some(engagement) = self.behavior.engagement_mut() else {
            return Err(unsupported(&self.hull, Capability::Attack));
        };
        engagement.attack(&self.hull, target)
    }

    pub fn stop_attack(&mut self) -> Result<()> {
        let Some(engagement) = self.behavior.engagement_mut() else {
            return Err(unsupported(&self.hull, Capability::Attack));
        };
        engagement.stop_attack(self.hull.id())
    }

    pub fn start_skimming(&mut self, corner: Point, size: i64, outbox: &mut Outbox) -> Result<()> {
        match &mut self.behavior {
            Behavior::SpillCleanup(skimming) => skimming.start(&mut self.hull, corner, size, outbox),
            _ => Err(unsupported(&self.hull, Capability::Skim)),
        }
    }

    // -----------------------------------------------------------------------
    // Damage and tick
    // -----------------------------------------------------------------------

    pub fn receive_hit(&mut self, force: i32, attacker: &Contact, ctx: &mut Context<'_>) -> Result<HitOutcome> {
        let outcome = self.hull.receive_hit(force, ctx.outbox)?;
        match outcome {
            HitOutcome::Damaged => self.behavior.on_hit(&mut self.hull, attacker, ctx),
            HitOutcome::Sunk => self.behavior.cancel(self.hull.id()),
        }
        Ok(outcome)
    }

    /// Moves the hull, then runs the behavior. `target` is the engaged vessel
    /// as currently observed, if it still exists.
    pub fn update(&mut self, target: Option<&Contact>, ctx: &mut Context<'_>) -> Option<Volley> {
        self.hull.update(ctx.outbox);
        self.behavior.update(&mut self.hull, target, ctx)
    }

    pub(crate) fn broadcast(&self, outbox: &mut Outbox) {
        self.hull.broadcast(outbox);
    }

    pub fn describe(&self) -> String {
        let label = self.kind.map_or("Vessel", VesselKind::label);
        match self.behavior.describe() {
            Some(extra) => format!("{label} {}; {extra}", self.hull.describe()),
            None => format!("{label} {}", self.hull.describe()),
        }
    }
}

fn find_depot<'d>(depots: &'d DepotTable, id: &DepotId) -> Result<&'d Depot> {
    depots
        .get(id)
        .ok_or_else(|| FleetError::UnknownEntity(id.0.clone()))
}

fn unsupported(hull: &Hull, capability: Capability) -> FleetError {
    FleetError::NotSupported {
        vessel: hull.id().0.clone(),
        capability,
    }
}

use crate::depot::{Depot, DepotTable};
use crate::error::{FleetError, Result};
use crate::navigation::{advance, normalize_bearing, range_between, CompassVector, Point};
use crate::types::{
    DepotId, Notification, Outbox, VesselId, DOCKING_RANGE, FUEL_CLOSE_ENOUGH,
};

/// Fixed performance figures of a vessel design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselSpec {
    pub fuel_capacity: f64,
    pub maximum_speed: f64,
    /// Fuel burned per unit of distance.
    pub fuel_consumption: f64,
    pub resistance: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Movement {
    Stopped,
    OnCourse,
    ToPoint(Point),
    ToDepot { depot: DepotId, point: Point },
    Docked(DepotId),
    DeadInTheWater,
    Sunk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Damaged,
    Sunk,
}

/// Motion, fuel and damage state shared by every vessel type.
#[derive(Debug, Clone)]
pub struct Hull {
    id: VesselId,
    location: Point,
    course: f64,
    speed: f64,
    fuel: f64,
    spec: VesselSpec,
    resistance: i32,
    movement: Movement,
}

impl Hull {
    pub fn new(id: VesselId, location: Point, spec: VesselSpec) -> Self {
        Self {
            id,
            location,
            course: 0.0,
            speed: 0.0,
            fuel: spec.fuel_capacity,
            resistance: spec.resistance,
            spec,
            movement: Movement::Stopped,
        }
    }

    // -----------------------------------------------------------------------
    // Readers
    // -----------------------------------------------------------------------

    pub fn id(&self) -> &VesselId {
        &self.id
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn course(&self) -> f64 {
        self.course
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    pub fn fuel_capacity(&self) -> f64 {
        self.spec.fuel_capacity
    }

    pub fn maximum_speed(&self) -> f64 {
        self.spec.maximum_speed
    }

    pub fn resistance(&self) -> i32 {
        self.resistance
    }

    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    pub fn can_move(&self) -> bool {
        !matches!(self.movement, Movement::DeadInTheWater | Movement::Sunk)
    }

    pub fn is_moving(&self) -> bool {
        matches!(
            self.movement,
            Movement::OnCourse | Movement::ToPoint(_) | Movement::ToDepot { .. }
        )
    }

    pub fn is_docked(&self) -> bool {
        matches!(self.movement, Movement::Docked(_))
    }

    pub fn is_afloat(&self) -> bool {
        self.movement != Movement::Sunk
    }

    pub fn docked_depot(&self) -> Option<&DepotId> {
        match &self.movement {
            Movement::Docked(depot) => Some(depot),
            _ => None,
        }
    }

    pub fn destination_depot(&self) -> Option<&DepotId> {
        match &self.movement {
            Movement::ToDepot { depot, .. } => Some(depot),
            _ => None,
        }
    }

    pub fn can_dock(&self, depot: &Depot) -> bool {
        self.movement == Movement::Stopped
            && range_between(self.location, depot.location()) <= DOCKING_RANGE
    }

    /// Fails unless the vessel may get under way at `speed`.
    pub fn check_underway(&self, speed: f64) -> Result<()> {
        if !self.can_move() {
            return Err(FleetError::CannotMove(self.id.0.clone()));
        }
        if speed < 0.0 {
            return Err(FleetError::InvalidSpeed(speed));
        }
        if speed > self.spec.maximum_speed {
            return Err(FleetError::SpeedExceeded {
                vessel: self.id.0.clone(),
                requested: speed,
                maximum: self.spec.maximum_speed,
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn set_course_and_speed(&mut self, course: f64, speed: f64, outbox: &mut Outbox) -> Result<()> {
        self.check_underway(speed)?;
        self.set_course(course, outbox);
        self.set_speed(speed, outbox);
        self.movement = Movement::OnCourse;
        tracing::info!(vessel = %self.id, course = self.course, speed, "will sail on course");
        Ok(())
    }

    pub fn set_destination_position_and_speed(
        &mut self,
        point: Point,
        speed: f64,
        outbox: &mut Outbox,
    ) -> Result<()> {
        self.check_underway(speed)?;
        self.head_for(point, speed, outbox);
        self.movement = Movement::ToPoint(point);
        tracing::info!(vessel = %self.id, destination = %point, speed, "will sail to position");
        Ok(())
    }

    pub fn set_destination_depot_and_speed(
        &mut self,
        depot: &Depot,
        speed: f64,
        outbox: &mut Outbox,
    ) -> Result<()> {
        self.check_underway(speed)?;
        self.head_for(depot.location(), speed, outbox);
        self.movement = Movement::ToDepot {
            depot: depot.id().clone(),
            point: depot.location(),
        };
        tracing::info!(vessel = %self.id, depot = %depot.id(), speed, "will sail to depot");
        Ok(())
    }

    pub fn stop(&mut self, outbox: &mut Outbox) -> Result<()> {
        if !self.can_move() {
            return Err(FleetError::CannotMove(self.id.0.clone()));
        }
        self.set_speed(0.0, outbox);
        self.movement = Movement::Stopped;
        tracing::info!(vessel = %self.id, "stopping");
        Ok(())
    }

    pub fn dock(&mut self, depot: &Depot, outbox: &mut Outbox) -> Result<()> {
        if !self.can_dock(depot) {
            return Err(FleetError::CannotDock {
                vessel: self.id.0.clone(),
                depot: depot.id().0.clone(),
            });
        }
        self.set_location(depot.location(), outbox);
        self.set_speed(0.0, outbox);
        self.movement = Movement::Docked(depot.id().clone());
        tracing::info!(vessel = %self.id, depot = %depot.id(), "docked");
        Ok(())
    }

    pub fn refuel(&mut self, depots: &mut DepotTable, outbox: &mut Outbox) -> Result<()> {
        let Movement::Docked(depot_id) = &self.movement else {
            return Err(FleetError::MustBeDocked(self.id.0.clone()));
        };
        let depot = depots
            .get_mut(depot_id)
            .ok_or_else(|| FleetError::UnknownEntity(depot_id.0.clone()))?;

        let needed = self.spec.fuel_capacity - self.fuel;
        if needed < FUEL_CLOSE_ENOUGH {
            self.set_fuel(self.spec.fuel_capacity, outbox);
            return Ok(());
        }
        let received = depot.provide_fuel(needed);
        self.set_fuel(self.fuel + received, outbox);
        tracing::info!(vessel = %self.id, received, fuel = self.fuel, "refueled");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Damage
    // -----------------------------------------------------------------------

    /// Absorbs a hit. A hull whose resistance drops below zero sinks at once.
    pub fn receive_hit(&mut self, force: i32, outbox: &mut Outbox) -> Result<HitOutcome> {
        if !self.is_afloat() {
            return Err(FleetError::NotAfloat(self.id.0.clone()));
        }
        if force < 0 {
            return Err(FleetError::InvalidForce(force));
        }
        self.resistance = self.resistance.saturating_sub(force);
        tracing::info!(vessel = %self.id, force, resistance = self.resistance, "hit");
        if self.resistance >= 0 {
            return Ok(HitOutcome::Damaged);
        }
        self.set_speed(0.0, outbox);
        self.movement = Movement::Sunk;
        outbox.push(Notification::Removed {
            name: self.id.0.clone(),
        });
        tracing::info!(vessel = %self.id, "sunk");
        Ok(HitOutcome::Sunk)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    pub fn update(&mut self, outbox: &mut Outbox) {
        if self.is_moving() {
            self.calculate_movement(outbox);
        }
        tracing::debug!(
            vessel = %self.id,
            location = %self.location,
            fuel = self.fuel,
            state = ?self.movement,
            "hull updated"
        );
    }

    /// Advances one hour, burning fuel for the distance actually covered.
    fn calculate_movement(&mut self, outbox: &mut Outbox) {
        let full_distance = self.speed;
        let full_fuel_required = full_distance * self.spec.fuel_consumption;

        let (distance_possible, time_possible) = if full_fuel_required <= self.fuel {
            (full_distance, 1.0)
        } else {
            let distance = self.fuel / self.spec.fuel_consumption;
            (distance, distance / full_distance)
        };

        let target = match &self.movement {
            Movement::ToPoint(point) | Movement::ToDepot { point, .. } => Some(*point),
            _ => None,
        };
        if let Some(target) = target {
            let distance_to_target = range_between(self.location, target);
            if distance_to_target <= distance_possible {
                self.set_location(target, outbox);
                self.set_fuel(
                    self.fuel - distance_to_target * self.spec.fuel_consumption,
                    outbox,
                );
                self.set_speed(0.0, outbox);
                self.movement = Movement::Stopped;
                tracing::info!(vessel = %self.id, location = %target, "arrived");
                return;
            }
        }

        let next = advance(self.location, self.course, full_distance * time_possible);
        self.set_location(next, outbox);
        if full_fuel_required >= self.fuel {
            self.set_fuel(0.0, outbox);
            self.set_speed(0.0, outbox);
            self.movement = Movement::DeadInTheWater;
            tracing::info!(vessel = %self.id, "out of fuel, dead in the water");
        } else {
            self.set_fuel(self.fuel - full_fuel_required, outbox);
        }
    }

    // -----------------------------------------------------------------------
    // Notifying setters
    // -----------------------------------------------------------------------

    fn head_for(&mut self, point: Point, speed: f64, outbox: &mut Outbox) {
        let bearing = CompassVector::between(self.location, point).bearing;
        self.set_course(bearing, outbox);
        self.set_speed(speed, outbox);
    }

    fn set_location(&mut self, location: Point, outbox: &mut Outbox) {
        self.location = location;
        outbox.push(Notification::Location {
            name: self.id.0.clone(),
            location,
        });
    }

    fn set_course(&mut self, course: f64, outbox: &mut Outbox) {
        self.course = normalize_bearing(course);
        outbox.push(Notification::Course {
            name: self.id.0.clone(),
            course: self.course,
        });
    }

    fn set_speed(&mut self, speed: f64, outbox: &mut Outbox) {
        self.speed = speed;
        outbox.push(Notification::Speed {
            name: self.id.0.clone(),
            speed,
        });
    }

    fn set_fuel(&mut self, fuel: f64, outbox: &mut Outbox) {
        self.fuel = fuel.max(0.0);
        outbox.push(Notification::Fuel {
            name: self.id.0.clone(),
            fuel: self.fuel,
        });
    }

    pub(crate) fn broadcast(&self, outbox: &mut Outbox) {
        let name = &self.id.0;
        outbox.push(Notification::Location {
            name: name.clone(),
            location: self.location,
        });
        outbox.push(Notification::Course {
            name: name.clone(),
            course: self.course,
        });
        outbox.push(Notification::Speed {
            name: name.clone(),
            speed: self.speed,
        });
        outbox.push(Notification::Fuel {
            name: name.clone(),
            fuel: self.fuel,
        });
    }

    pub fn describe(&self) -> String {
        let status = match &self.movement {
            Movement::Stopped => "Stopped".to_string(),
            Movement::OnCourse => format!(
                "Moving on course {:.2} deg, speed {:.2} nm/hr",
                self.course, self.speed
            ),
            Movement::ToPoint(point) => format!(
                "Moving to {point} on course {:.2} deg, speed {:.2} nm/hr",
                self.course, self.speed
            ),
            Movement::ToDepot { depot, .. } => format!(
                "Moving to {depot} on course {:.2} deg, speed {:.2} nm/hr",
                self.course, self.speed
            ),
            Movement::Docked(depot) => format!("Docked at {depot}"),
            Movement::DeadInTheWater => "Dead in the water".to_string(),
            Movement::Sunk => "Sunk".to_string(),
        };
        format!(
            "{} at {}, fuel: {:.2} tons, resistance: {}; {status}",
            self.id, self.location, self.fuel, self.resistance
        )
    }
}

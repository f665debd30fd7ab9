use crate::error::{FleetError, Result};
use crate::navigation::range_between;
use crate::types::{Outbox, VesselId};
use crate::vessel::Hull;

use super::{Contact, Volley};

/// What a combatant does when its target is beyond firing range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRange {
    Disengage,
    Pursue,
}

#[derive(Debug, Clone)]
pub struct Engagement {
    firepower: i32,
    range: f64,
    policy: OutOfRange,
    target: Option<VesselId>,
}

impl Engagement {
    pub fn new(firepower: i32, range: f64, policy: OutOfRange) -> Self {
        Self {
            firepower,
            range,
            policy,
            target: None,
        }
    }

    pub fn firepower(&self) -> i32 {
        self.firepower
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn policy(&self) -> OutOfRange {
        self.policy
    }

    pub fn target(&self) -> Option<&VesselId> {
        self.target.as_ref()
    }

    pub fn is_attacking(&self) -> bool {
        self.target.is_some()
    }

    pub fn attack(&mut self, hull: &Hull, target: &Contact) -> Result<()> {
        if !hull.is_afloat() {
            return Err(FleetError::NotAfloat(hull.id().0.clone()));
        }
        if &target.id == hull.id() {
            return Err(FleetError::SelfTarget(hull.id().0.clone()));
        }
        if self.target.as_ref() == Some(&target.id) {
            return Err(FleetError::AlreadyEngaged(target.id.0.clone()));
        }
        tracing::info!(vessel = %hull.id(), target = %target.id, "will attack");
        self.target = Some(target.id.clone());
        Ok(())
    }

    pub fn stop_attack(&mut self, vessel: &VesselId) -> Result<()> {
        if self.target.is_none() {
            return Err(FleetError::NotEngaged(vessel.0.clone()));
        }
        self.disengage(vessel);
        Ok(())
    }

    pub fn disengage(&mut self, vessel: &VesselId) {
        if let Some(target) = self.target.take() {
            tracing::info!(vessel = %vessel, target = %target, "stopping attack");
        }
    }

    /// Returns fire on the attacker when idle.
    pub(crate) fn counterattack(&mut self, hull: &Hull, attacker: &Contact) {
        if !hull.is_afloat() || self.is_attacking() {
            return;
        }
        if let Err(err) = self.attack(hull, attacker) {
            tracing::warn!(vessel = %hull.id(), error = %err, "counterattack refused");
        }
    }

    /// `target` is the engaged vessel as seen this tick, or `None` if it is gone.
    pub(crate) fn update(
        &mut self,
        hull: &mut Hull,
        target: Option<&Contact>,
        outbox: &mut Outbox,
    ) -> Option<Volley> {
        self.target.as_ref()?;
        let contact = match target {
            Some(contact) if hull.is_afloat() && contact.afloat => contact,
            _ => {
                tracing::info!(vessel = %hull.id(), "target is no longer afloat");
                self.disengage(hull.id());
                return None;
            }
        };

        let range = range_between(hull.location(), contact.location);
        if range <= self.range {
            tracing::info!(vessel = %hull.id(), target = %contact.id, force = self.firepower, "firing");
            return Some(Volley {
                target: contact.id.clone(),
                force: self.firepower,
            });
        }

        match self.policy {
            OutOfRange::Disengage => {
                tracing::info!(vessel = %hull.id(), target = %contact.id, range, "target is now out of range");
                self.disengage(hull.id());
            }
            OutOfRange::Pursue if hull.can_move() => {
                let speed = hull.maximum_speed();
                if let Err(err) = hull.set_destination_position_and_speed(contact.location, speed, outbox) {
                    tracing::warn!(vessel = %hull.id(), error = %err, "pursuit failed");
                }
            }
            OutOfRange::Pursue => {}
        }
        None
    }

    pub fn describe(&self) -> String {
        match &self.target {
            Some(target) => format!("Attacking {target}"),
            None => "Not attacking".to_string(),
        }
    }
}

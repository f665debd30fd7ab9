//! Routing of commands to individual vessels and fan-out through groups.

use crate::behavior::{Contact, Context};
use crate::error::{FleetError, Result};
use crate::types::{Command, Order, VesselId};
use crate::vessel::HitOutcome;
use crate::World;

/// Result of one vessel's share of a group command.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberOutcome {
    pub member: VesselId,
    pub result: Result<()>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FanOut {
    pub group: String,
    pub outcomes: Vec<MemberOutcome>,
}

impl FanOut {
    pub fn reached(&self) -> impl Iterator<Item = &VesselId> {
        self.outcomes.iter().map(|outcome| &outcome.member)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &VesselId> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .map(|outcome| &outcome.member)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&VesselId, &FleetError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (&outcome.member, err)))
    }
}

/// How a successfully routed command was delivered.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Structural,
    Individual(VesselId),
    Group(FanOut),
}

impl World {
    /// Applies one command and delivers the notifications it produced.
    pub fn execute(&mut self, command: &Command) -> Result<Dispatch> {
        let dispatch = match command {
            Command::Create {
                name,
                type_tag,
                position,
            } => self.create(name, type_tag, *position).map(|()| Dispatch::Structural),
            Command::CreateGroup { name } => self.create_group(name).map(|()| Dispatch::Structural),
            Command::AddToGroup { group, member } => {
                self.add_to_group(group, member).map(|()| Dispatch::Structural)
            }
            Command::RemoveFromGroup { group, member } => self
                .remove_from_group(group, member)
                .map(|()| Dispatch::Structural),
            Command::RemoveGroup { name } => self.remove_group(name).map(|()| Dispatch::Structural),
            Command::RemoveVessel { name } => self.remove_vessel(name).map(|()| Dispatch::Structural),
            Command::Issue { target, order } => self.issue(target, order),
        };
        self.flush();
        dispatch
    }

    /// Sends `order` to a vessel, or to every vessel below a group.
    ///
    /// Group members are tried independently in name order. Failures are
    /// collected in the returned [`FanOut`], except for `Stop`, whose first
    /// failure is returned as an error once every member has been tried.
    pub fn issue(&mut self, target: &str, order: &Order) -> Result<Dispatch> {
        let node = self.node_key(target)?;
        let attack_target = self.preflight(order)?;

        if !self.fleet.is_group(node) {
            let id = VesselId::from(target);
            let result = self.apply_order(&id, order, attack_target.as_ref());
            self.flush();
            return result.map(|()| Dispatch::Individual(id));
        }

        let mut fan_out = FanOut {
            group: target.to_string(),
            outcomes: Vec::new(),
        };
        for member in self.fleet.vessels_under(node) {
            let result = self.apply_order(&member, order, attack_target.as_ref());
            if let Err(err) = &result {
                tracing::warn!(group = %target, member = %member, error = %err, order = order.label(), "member rejected order");
            }
            fan_out.outcomes.push(MemberOutcome { member, result });
        }
        self.flush();

        if matches!(order, Order::Stop) {
            if let Some((member, err)) = fan_out.failures().next() {
                return Err(FleetError::MemberFailed {
                    member: member.0.clone(),
                    source: Box::new(err.clone()),
                });
            }
        }
        Ok(Dispatch::Group(fan_out))
    }

    /// Checks the arguments every recipient shares. Returns the attack target.
    fn preflight(&self, order: &Order) -> Result<Option<Contact>> {
        match order {
            Order::DepotAndSpeed { depot, .. }
            | Order::LoadAt { depot }
            | Order::UnloadAt { depot }
            | Order::DockAt { depot } => {
                self.depot(depot.as_str())?;
                Ok(None)
            }
            Order::Attack { target } => Ok(Some(self.vessel(target)?.contact())),
            Order::CourseAndSpeed { speed, .. }
            | Order::PositionAndSpeed { speed, .. } => {
                if *speed < 0.0 {
                    return Err(FleetError::InvalidSpeed(*speed));
                }
                Ok(None)
            }
            Order::Refuel | Order::Stop | Order::StopAttack | Order::StartSkimming { .. } => Ok(None),
        }
    }

    fn apply_order(&mut self, id: &VesselId, order: &Order, attack_target: Option<&Contact>) -> Result<()> {
        let vessel = self
            .vessels
            .get_mut(id)
            .ok_or_else(|| FleetError::UnknownEntity(id.0.clone()))?;
        let mut ctx = Context {
            depots: &mut self.depots,
            outbox: &mut self.outbox,
        };
        match order {
            Order::CourseAndSpeed { course, speed } => {
                vessel.set_course_and_speed(*course, *speed, ctx.outbox)
            }
            Order::PositionAndSpeed { position, speed } => {
                vessel.set_destination_position_and_speed(*position, *speed, ctx.outbox)
            }
            Order::DepotAndSpeed { depot, speed } => {
                vessel.set_destination_depot_and_speed(depot, *speed, &mut ctx)
            }
            Order::LoadAt { depot } => vessel.set_load_destination(depot, &mut ctx),
            Order::UnloadAt { depot } => vessel.set_unload_destination(depot, &mut ctx),
            Order::DockAt { depot } => vessel.dock(depot, &mut ctx),
            Order::Attack { target } => match attack_target {
                Some(contact) => vessel.attack(contact),
                None => Err(FleetError::UnknownEntity(target.clone())),
            },
            Order::Refuel => vessel.refuel(&mut ctx),
            Order::Stop => vessel.stop(ctx.outbox),
            Order::StopAttack => vessel.stop_attack(),
            Order::StartSkimming { corner, size } => vessel.start_skimming(*corner, *size, ctx.outbox),
        }
    }

    /// Delivers a hit from `attacker` to the vessel `target`.
    ///
    /// A hull that sinks is removed from the registry and its group at once.
    pub fn receive_hit(&mut self, target: &str, force: i32, attacker: &str) -> Result<HitOutcome> {
        if self.is_group(target) {
            return Err(FleetError::GroupCannotBeHit(target.to_string()));
        }
        let attacker = self.vessel(attacker)?.contact();
        let outcome = self.deliver_hit(&VesselId::from(target), force, &attacker);
        self.flush();
        outcome
    }

    pub(crate) fn deliver_hit(&mut self, target: &VesselId, force: i32, attacker: &Contact) -> Result<HitOutcome> {
        let vessel = self
            .vessels
            .get_mut(target)
            .ok_or_else(|| FleetError::UnknownEntity(target.0.clone()))?;
        let mut ctx = Context {
            depots: &mut self.depots,
            outbox: &mut self.outbox,
        };
        let outcome = vessel.receive_hit(force, attacker, &mut ctx)?;
        if outcome == HitOutcome::Sunk {
            self.discard_vessel(target);
        }
        Ok(outcome)
    }
}

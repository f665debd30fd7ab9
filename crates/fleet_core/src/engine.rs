use crate::behavior::{Context, Volley};
use crate::commands::Dispatch;
use crate::error::FleetError;
use crate::types::{CommandEnvelope, CommandId, DepotId, VesselId};
use crate::World;

/// What happened to one command during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandReport {
    pub id: CommandId,
    pub result: Result<Dispatch, FleetError>,
}

/// Advance the simulation by one tick.
///
/// Order of operations:
/// 1. Apply commands scheduled for this tick, in the order given.
/// 2. Update every depot and vessel in name order.
/// 3. Increment the clock.
///
/// Returns one report per applied command.
pub fn tick(world: &mut World, commands: &[CommandEnvelope]) -> Vec<CommandReport> {
    let reports = apply_commands(world, commands);
    world.update();
    reports
}

/// Applies the envelopes due at the current tick without advancing time.
fn apply_commands(world: &mut World, commands: &[CommandEnvelope]) -> Vec<CommandReport> {
    let current_tick = world.time();
    let mut reports = Vec::new();

    for envelope in commands {
        if envelope.execute_at_tick != current_tick {
            continue;
        }
        let result = world.execute(&envelope.command);
        if let Err(err) = &result {
            tracing::warn!(command = %envelope.id, error = %err, "command rejected");
        }
        reports.push(CommandReport {
            id: envelope.id.clone(),
            result,
        });
    }
    reports
}

enum Subject {
    Depot(DepotId),
    Vessel(VesselId),
}

impl Subject {
    fn name(&self) -> &str {
        match self {
            Self::Depot(id) => id.as_str(),
            Self::Vessel(id) => id.as_str(),
        }
    }
}

impl World {
    /// Updates every entity once, in lexicographic name order, then advances
    /// the clock. Vessels sunk earlier in the same pass are skipped.
    pub fn update(&mut self) {
        let mut subjects: Vec<Subject> = self
            .depots
            .keys()
            .cloned()
            .map(Subject::Depot)
            .chain(self.vessels.keys().cloned().map(Subject::Vessel))
            .collect();
        subjects.sort_by(|a, b| a.name().cmp(b.name()));

        tracing::debug!(time = self.time, entities = subjects.len(), "updating world");
        for subject in subjects {
            match subject {
                Subject::Depot(id) => {
                    if let Some(depot) = self.depots.get_mut(&id) {
                        depot.update();
                    }
                }
                Subject::Vessel(id) => self.update_vessel(&id),
            }
        }
        self.time += 1;
        self.flush();
    }

    fn update_vessel(&mut self, id: &VesselId) {
        // Collect the engaged target first to avoid split borrows.
        let Some(engaged) = self.vessels.get(id).map(|v| v.engaged_target().cloned()) else {
            return;
        };
        let contact = engaged.and_then(|target| self.vessels.get(&target).map(|v| v.contact()));

        let Some(vessel) = self.vessels.get_mut(id) else {
            return;
        };
        let mut ctx = Context {
            depots: &mut self.depots,
            outbox: &mut self.outbox,
        };
        if let Some(volley) = vessel.update(contact.as_ref(), &mut ctx) {
            self.resolve_volley(id, &volley);
        }
    }

    fn resolve_volley(&mut self, attacker: &VesselId, volley: &Volley) {
        let Some(attacker) = self.vessels.get(attacker).map(|v| v.contact()) else {
            return;
        };
        if let Err(err) = self.deliver_hit(&volley.target, volley.force, &attacker) {
            tracing::warn!(attacker = %attacker.id, target = %volley.target, error = %err, "volley missed");
        }
    }
}

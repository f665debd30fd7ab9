use crate::depot::{Depot, DepotTable};
use crate::navigation::{range_between, Point};
use crate::vessel::Hull;

use super::{Contact, Context, Engagement};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evasion {
    retreat_distance: f64,
}

impl Evasion {
    pub fn new(retreat_distance: f64) -> Self {
        Self { retreat_distance }
    }

    pub fn retreat_distance(&self) -> f64 {
        self.retreat_distance
    }

    /// Breaks off any attack and runs for a depot away from `attacker`.
    pub(crate) fn take_evasive_action(
        &self,
        hull: &mut Hull,
        engagement: &mut Engagement,
        attacker: &Contact,
        ctx: &mut Context<'_>,
    ) {
        if !hull.can_move() {
            return;
        }
        tracing::info!(vessel = %hull.id(), attacker = %attacker.id, "taking evasive action");
        engagement.disengage(hull.id());

        let Some(refuge) = retreat_depot(attacker.location, ctx.depots, self.retreat_distance) else {
            tracing::warn!(vessel = %hull.id(), "no depot to retreat to");
            return;
        };
        let speed = hull.maximum_speed();
        if let Err(err) = hull.set_destination_depot_and_speed(refuge, speed, ctx.outbox) {
            tracing::warn!(vessel = %hull.id(), error = %err, "retreat failed");
        }
    }
}

/// Nearest depot at least `min_distance` from `threat`, else the farthest one.
/// Depot name order breaks distance ties either way.
pub fn retreat_depot(threat: Point, depots: &DepotTable, min_distance: f64) -> Option<&Depot> {
    let mut ranked: Vec<(&Depot, f64)> = depots
        .values()
        .map(|depot| (depot, range_between(threat, depot.location())))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((depot, _)) = ranked.iter().find(|(_, range)| *range >= min_distance) {
        return Some(depot);
    }
    let farthest = ranked.last()?.1;
    ranked
        .iter()
        .find(|(_, range)| range.total_cmp(&farthest).is_eq())
        .map(|(depot, _)| *depot)
}

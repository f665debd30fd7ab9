//! The registry that owns every depot, vessel and group by name.
//!
//! Command routing lives in `commands.rs`, the per-tick update in `engine.rs`.

use std::collections::BTreeMap;

use crate::depot::{Depot, DepotTable};
use crate::error::{FleetError, Result};
use crate::factory::{create_vessel, Blueprint};
use crate::fleet::{Fleet, NodeKey};
use crate::navigation::Point;
use crate::observer::{deliver, ObserverId, SharedObserver};
use crate::types::{DepotId, Notification, Outbox, VesselId};
use crate::vessel::Vessel;

#[derive(Default)]
pub struct World {
    pub(crate) time: u64,
    pub(crate) depots: DepotTable,
    pub(crate) vessels: BTreeMap<VesselId, Vessel>,
    pub(crate) fleet: Fleet,
    pub(crate) outbox: Outbox,
    observers: Vec<(ObserverId, SharedObserver)>,
    next_observer_id: u64,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("time", &self.time)
            .field("depots", &self.depots.len())
            .field("vessels", &self.vessels.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

/// Two names clash when their first two characters match.
fn abbreviation(name: &str) -> &str {
    let end = name.char_indices().nth(2).map_or(name.len(), |(i, _)| i);
    &name[..end]
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    fn all_names(&self) -> impl Iterator<Item = &str> {
        self.depots
            .keys()
            .map(DepotId::as_str)
            .chain(self.vessels.keys().map(VesselId::as_str))
            .chain(self.fleet.group_names())
    }

    pub fn is_name_in_use(&self, name: &str) -> bool {
        let wanted = abbreviation(name);
        self.all_names().any(|existing| abbreviation(existing) == wanted)
    }

    pub fn validate_new_name(&self, name: &str) -> Result<()> {
        if name.chars().count() < 2 || name.chars().any(char::is_whitespace) {
            return Err(FleetError::InvalidName(name.to_string()));
        }
        if self.is_name_in_use(name) {
            return Err(FleetError::NameCollision(name.to_string()));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Creation and removal
    // -----------------------------------------------------------------------

    pub fn add_depot(&mut self, depot: Depot) -> Result<()> {
        self.validate_new_name(depot.id().as_str())?;
        depot.broadcast(&mut self.outbox);
        tracing::info!(depot = %depot.id(), location = %depot.location(), "depot constructed");
        self.depots.insert(depot.id().clone(), depot);
        self.flush();
        Ok(())
    }

    pub fn add_vessel(&mut self, vessel: Vessel) -> Result<()> {
        self.validate_new_name(vessel.id().as_str())?;
        self.fleet.enlist_vessel(vessel.id());
        vessel.broadcast(&mut self.outbox);
        tracing::info!(vessel = %vessel.id(), location = %vessel.location(), "vessel constructed");
        self.vessels.insert(vessel.id().clone(), vessel);
        self.flush();
        Ok(())
    }

    /// Builds a vessel or an empty group from a type tag.
    pub fn create(&mut self, name: &str, type_tag: &str, location: Point) -> Result<()> {
        match type_tag.parse::<Blueprint>()? {
            Blueprint::Group => self.create_group(name),
            Blueprint::Vessel(_) => self.add_vessel(create_vessel(name, type_tag, location)?),
        }
    }

    pub fn create_group(&mut self, name: &str) -> Result<()> {
        self.validate_new_name(name)?;
        self.fleet.create_group(name)?;
        tracing::info!(group = %name, "group created");
        Ok(())
    }

    pub fn remove_group(&mut self, name: &str) -> Result<()> {
        let key = self.group_key(name)?;
        self.fleet.release(key);
        tracing::info!(group = %name, "group removed");
        Ok(())
    }

    pub fn remove_vessel(&mut self, name: &str) -> Result<()> {
        let id = self.vessel(name)?.id().clone();
        self.outbox.push(Notification::Removed {
            name: id.0.clone(),
        });
        self.discard_vessel(&id);
        tracing::info!(vessel = %id, "vessel removed");
        self.flush();
        Ok(())
    }

    /// Drops a vessel from the registry and from whatever group held it.
    pub(crate) fn discard_vessel(&mut self, id: &VesselId) {
        self.vessels.remove(id);
        if let Some(key) = self.fleet.key(id.as_str()) {
            self.fleet.release(key);
        }
    }

    // -----------------------------------------------------------------------
    // Group structure
    // -----------------------------------------------------------------------

    pub fn add_to_group(&mut self, group: &str, member: &str) -> Result<()> {
        let group_key = self.group_key(group)?;
        let member_key = self.node_key(member)?;
        self.fleet.add_child(group_key, member_key)
    }

    pub fn remove_from_group(&mut self, group: &str, member: &str) -> Result<()> {
        let group_key = self.group_key(group)?;
        self.fleet.remove_child(group_key, member)
    }

    pub fn remove_all_from_group(&mut self, group: &str) -> Result<()> {
        let group_key = self.group_key(group)?;
        self.fleet.remove_all_children(group_key);
        Ok(())
    }

    pub(crate) fn node_key(&self, name: &str) -> Result<NodeKey> {
        self.fleet
            .key(name)
            .ok_or_else(|| FleetError::UnknownEntity(name.to_string()))
    }

    fn group_key(&self, name: &str) -> Result<NodeKey> {
        let key = self.node_key(name)?;
        if self.fleet.is_group(key) {
            Ok(key)
        } else {
            Err(FleetError::NotAGroup(name.to_string()))
        }
    }

    // -----------------------------------------------------------------------
    // Readers
    // -----------------------------------------------------------------------

    pub fn depots(&self) -> &DepotTable {
        &self.depots
    }

    pub fn vessels(&self) -> impl Iterator<Item = &Vessel> {
        self.vessels.values()
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn is_group(&self, name: &str) -> bool {
        self.fleet.key(name).is_some_and(|key| self.fleet.is_group(key))
    }

    pub fn depot(&self, name: &str) -> Result<&Depot> {
        self.depots
            .get(&DepotId::from(name))
            .ok_or_else(|| FleetError::UnknownEntity(name.to_string()))
    }

    /// An individual vessel. Groups are rejected with `NotAnIndividual`.
    pub fn vessel(&self, name: &str) -> Result<&Vessel> {
        if let Some(vessel) = self.vessels.get(&VesselId::from(name)) {
            return Ok(vessel);
        }
        if self.is_group(name) {
            Err(FleetError::NotAnIndividual(name.to_string()))
        } else {
            Err(FleetError::UnknownEntity(name.to_string()))
        }
    }

    /// Name of the group directly holding `name`, if any.
    pub fn group_of(&self, name: &str) -> Option<&str> {
        let key = self.fleet.key(name)?;
        let parent = self.fleet.parent(key)?;
        self.fleet.name(parent)
    }

    pub fn members(&self, group: &str) -> Result<Vec<String>> {
        let key = self.group_key(group)?;
        Ok(self
            .fleet
            .children(key)
            .into_iter()
            .filter_map(|child| self.fleet.name(child).map(str::to_string))
            .collect())
    }

    pub fn describe(&self, name: &str) -> Result<String> {
        if let Ok(depot) = self.depot(name) {
            return Ok(depot.describe());
        }
        if let Some(vessel) = self.vessels.get(&VesselId::from(name)) {
            return Ok(vessel.describe());
        }
        let key = self.node_key(name)?;
        self.fleet.describe_group(key)
    }

    /// One line per entity, in name order.
    pub fn status(&self) -> Vec<String> {
        let mut names: Vec<&str> = self.all_names().collect();
        names.sort_unstable();
        names
            .into_iter()
            .filter_map(|name| self.describe(name).ok())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Attaches an observer and replays the current state of every entity to it.
    pub fn attach(&mut self, observer: SharedObserver) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;

        let mut replay = Outbox::new();
        for depot in self.depots.values() {
            depot.broadcast(&mut replay);
        }
        for vessel in self.vessels.values() {
            vessel.broadcast(&mut replay);
        }
        {
            let mut target = observer.borrow_mut();
            for notification in &replay {
                deliver(notification, &mut *target);
            }
        }
        self.observers.push((id, observer));
        id
    }

    pub fn detach(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Delivers queued notifications to every attached observer, in order.
    pub(crate) fn flush(&mut self) {
        let pending = std::mem::take(&mut self.outbox);
        for notification in &pending {
            for (_, observer) in &self.observers {
                deliver(notification, &mut *observer.borrow_mut());
            }
        }
    }
}

//! Named groups of vessels and sub-groups.
//!
//! Nodes live in a generational arena. Parent and child links are arena keys,
//! never owning references, and a stale key simply fails to resolve. The
//! parent/child graph is kept acyclic and every node has at most one parent.

use std::collections::BTreeMap;

use slotmap::{new_key_type, SlotMap};

use crate::error::{FleetError, Result};
use crate::types::VesselId;

new_key_type! {
    pub struct NodeKey;
}

#[derive(Debug, Clone)]
pub enum Member {
    Vessel(VesselId),
    Group(BTreeMap<String, NodeKey>),
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    member: Member,
    parent: Option<NodeKey>,
}

#[derive(Debug, Default)]
pub struct Fleet {
    nodes: SlotMap<NodeKey, Node>,
    by_name: BTreeMap<String, NodeKey>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enlist_vessel(&mut self, id: &VesselId) -> NodeKey {
        self.insert(id.0.clone(), Member::Vessel(id.clone()))
    }

    pub fn create_group(&mut self, name: &str) -> Result<NodeKey> {
        if self.by_name.contains_key(name) {
            return Err(FleetError::NameCollision(name.to_string()));
        }
        Ok(self.insert(name.to_string(), Member::Group(BTreeMap::new())))
    }

    fn insert(&mut self, name: String, member: Member) -> NodeKey {
        let key = self.nodes.insert(Node {
            name: name.clone(),
            member,
            parent: None,
        });
        self.by_name.insert(name, key);
        key
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub fn key(&self, name: &str) -> Option<NodeKey> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, key: NodeKey) -> Option<&str> {
        self.nodes.get(key).map(|node| node.name.as_str())
    }

    pub fn member(&self, key: NodeKey) -> Option<&Member> {
        self.nodes.get(key).map(|node| &node.member)
    }

    pub fn is_group(&self, key: NodeKey) -> bool {
        matches!(self.member(key), Some(Member::Group(_)))
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.by_name
            .iter()
            .filter(|(_, key)| self.is_group(**key))
            .map(|(name, _)| name.as_str())
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes
            .get(key)
            .and_then(|node| node.parent)
            .filter(|parent| self.nodes.contains_key(*parent))
    }

    /// Live immediate children in name order.
    pub fn children(&self, group: NodeKey) -> Vec<NodeKey> {
        match self.member(group) {
            Some(Member::Group(children)) => children
                .values()
                .copied()
                .filter(|key| self.nodes.contains_key(*key))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn child(&self, group: NodeKey, name: &str) -> Option<NodeKey> {
        match self.member(group) {
            Some(Member::Group(children)) => children
                .get(name)
                .copied()
                .filter(|key| self.nodes.contains_key(*key)),
            _ => None,
        }
    }

    /// True if `target` is somewhere below `group`.
    pub fn contains(&self, group: NodeKey, target: NodeKey) -> bool {
        self.children(group)
            .into_iter()
            .any(|child| child == target || self.contains(child, target))
    }

    /// Every vessel below `group`, depth first in name order.
    pub fn vessels_under(&self, group: NodeKey) -> Vec<VesselId> {
        let mut found = Vec::new();
        self.collect_vessels(group, &mut found);
        found
    }

    fn collect_vessels(&self, group: NodeKey, found: &mut Vec<VesselId>) {
        for child in self.children(group) {
            match self.member(child) {
                Some(Member::Vessel(id)) => found.push(id.clone()),
                Some(Member::Group(_)) => self.collect_vessels(child, found),
                None => {}
            }
        }
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    pub fn add_child(&mut self, group: NodeKey, child: NodeKey) -> Result<()> {
        let group_name = self.require_group(group)?.to_string();
        let child_name = self
            .name(child)
            .ok_or_else(|| FleetError::UnknownEntity(format!("{child:?}")))?
            .to_string();

        if child == group || self.contains(child, group) {
            return Err(FleetError::CycleDetected {
                group: group_name,
                child: child_name,
            });
        }
        if self.parent(child).is_some() {
            return Err(FleetError::AlreadyHasParent(child_name));
        }

        if let Some(Member::Group(children)) = self.nodes.get_mut(group).map(|n| &mut n.member) {
            children.insert(child_name.clone(), child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(group);
        }
        tracing::info!(group = %group_name, member = %child_name, "added to group");
        Ok(())
    }

    pub fn remove_child(&mut self, group: NodeKey, child_name: &str) -> Result<()> {
        let group_name = self.require_group(group)?.to_string();
        let removed = match self.nodes.get_mut(group).map(|n| &mut n.member) {
            Some(Member::Group(children)) => children.remove(child_name),
            _ => None,
        };
        let Some(child) = removed else {
            return Err(FleetError::NoSuchChild {
                group: group_name,
                child: child_name.to_string(),
            });
        };
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        tracing::info!(group = %group_name, member = %child_name, "removed from group");
        Ok(())
    }

    pub fn remove_all_children(&mut self, group: NodeKey) {
        let drained = match self.nodes.get_mut(group).map(|n| &mut n.member) {
            Some(Member::Group(children)) => std::mem::take(children),
            _ => return,
        };
        for child in drained.into_values() {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = None;
            }
        }
    }

    /// Destroys a node, detaching it from its parent and orphaning its children.
    pub fn release(&mut self, key: NodeKey) {
        let Some(node) = self.nodes.remove(key) else {
            return;
        };
        self.by_name.remove(&node.name);
        let parent_member = node
            .parent
            .and_then(|parent| self.nodes.get_mut(parent))
            .map(|parent| &mut parent.member);
        if let Some(Member::Group(siblings)) = parent_member {
            siblings.remove(&node.name);
        }
        if let Member::Group(children) = node.member {
            for child in children.into_values() {
                if let Some(orphan) = self.nodes.get_mut(child) {
                    orphan.parent = None;
                }
            }
        }
    }

    fn require_group(&self, key: NodeKey) -> Result<&str> {
        let node = self
            .nodes
            .get(key)
            .ok_or_else(|| FleetError::UnknownEntity(format!("{key:?}")))?;
        match node.member {
            Member::Group(_) => Ok(&node.name),
            Member::Vessel(_) => Err(FleetError::NotAGroup(node.name.clone())),
        }
    }

    pub fn describe_group(&self, group: NodeKey) -> Result<String> {
        let name = self.require_group(group)?;
        let members: Vec<&str> = self
            .children(group)
            .into_iter()
            .filter_map(|key| self.name(key))
            .collect();
        if members.is_empty() {
            Ok(format!("Group {name} has no members"))
        } else {
            Ok(format!("Group {name} has members: {}", members.join(", ")))
        }
    }
}

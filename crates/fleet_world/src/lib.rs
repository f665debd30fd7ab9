//! Scenario loading and generation shared by fleet_cli and the tests.

use anyhow::{Context, Result};
use fleet_core::{Depot, DepotId, Point, Vessel, VesselId, VesselKind, World};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotDef {
    pub name: String,
    pub position: Point,
    #[serde(default)]
    pub fuel: f64,
    #[serde(default)]
    pub production_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselDef {
    pub name: String,
    pub kind: VesselKind,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Everything needed to build a [`World`] at time zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub depots: Vec<DepotDef>,
    #[serde(default)]
    pub vessels: Vec<VesselDef>,
    #[serde(default)]
    pub groups: Vec<GroupDef>,
}

fn prefix(name: &str) -> &str {
    let end = name.char_indices().nth(2).map_or(name.len(), |(i, _)| i);
    &name[..end]
}

/// Validates a scenario, panicking on any authoring error.
///
/// Catches mistakes like: a name too short to abbreviate, two entities whose
/// names share a two-character prefix, negative depot stock, or a group
/// listing a member that is not defined anywhere.
pub fn validate_scenario(scenario: &Scenario) {
    let names: Vec<&str> = scenario
        .depots
        .iter()
        .map(|d| d.name.as_str())
        .chain(scenario.vessels.iter().map(|v| v.name.as_str()))
        .chain(scenario.groups.iter().map(|g| g.name.as_str()))
        .collect();

    let mut prefixes: BTreeMap<&str, &str> = BTreeMap::new();
    for name in names {
        assert!(
            name.chars().count() >= 2 && !name.chars().any(char::is_whitespace),
            "scenario name '{name}' must be at least two characters with no whitespace",
        );
        let existing = prefixes.insert(prefix(name), name);
        assert!(
            existing.is_none(),
            "scenario name '{name}' collides with '{}'",
            existing.unwrap_or_default(),
        );
    }

    for depot in &scenario.depots {
        assert!(
            depot.fuel >= 0.0,
            "depot '{}' has negative fuel: {}",
            depot.name,
            depot.fuel,
        );
        assert!(
            depot.production_rate >= 0.0,
            "depot '{}' has negative production rate: {}",
            depot.name,
            depot.production_rate,
        );
    }

    // Group members must be vessels or groups, each listed under one group only.
    let members_allowed: HashSet<&str> = scenario
        .vessels
        .iter()
        .map(|v| v.name.as_str())
        .chain(scenario.groups.iter().map(|g| g.name.as_str()))
        .collect();
    let mut placed: HashSet<&str> = HashSet::new();
    for group in &scenario.groups {
        for member in &group.members {
            assert!(
                members_allowed.contains(member.as_str()),
                "group '{}' member '{}' is not a known vessel or group",
                group.name,
                member,
            );
            assert!(
                placed.insert(member.as_str()),
                "group '{}' member '{}' already belongs to another group",
                group.name,
                member,
            );
        }
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let scenario: Scenario =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    validate_scenario(&scenario);
    Ok(scenario)
}

/// Builds the world a scenario describes. Depots first, then vessels, then
/// groups in the order given.
pub fn build_world(scenario: &Scenario) -> Result<World> {
    let mut world = World::new();
    for def in &scenario.depots {
        let depot = Depot::new(
            DepotId(def.name.clone()),
            def.position,
            def.fuel,
            def.production_rate,
        );
        world
            .add_depot(depot)
            .with_context(|| format!("adding depot {}", def.name))?;
    }
    for def in &scenario.vessels {
        let vessel = Vessel::new(def.kind, VesselId(def.name.clone()), def.position);
        world
            .add_vessel(vessel)
            .with_context(|| format!("adding vessel {}", def.name))?;
    }
    for def in &scenario.groups {
        world
            .create_group(&def.name)
            .with_context(|| format!("creating group {}", def.name))?;
    }
    for def in &scenario.groups {
        for member in &def.members {
            world
                .add_to_group(&def.name, member)
                .with_context(|| format!("adding {member} to group {}", def.name))?;
        }
    }
    tracing::info!(
        depots = scenario.depots.len(),
        vessels = scenario.vessels.len(),
        groups = scenario.groups.len(),
        "world built from scenario"
    );
    Ok(world)
}

/// Three depots and three vessels around a small harbor.
pub fn default_scenario() -> Scenario {
    let depot = |name: &str, x: f64, y: f64, fuel: f64, production_rate: f64| DepotDef {
        name: name.to_string(),
        position: Point::new(x, y),
        fuel,
        production_rate,
    };
    let vessel = |name: &str, kind: VesselKind, x: f64, y: f64| VesselDef {
        name: name.to_string(),
        kind,
        position: Point::new(x, y),
    };
    Scenario {
        depots: vec![
            depot("Exxon", 10.0, 10.0, 1000.0, 200.0),
            depot("Shell", 0.0, 30.0, 1000.0, 200.0),
            depot("Bermuda", 20.0, 20.0, 0.0, 0.0),
        ],
        vessels: vec![
            vessel("Ajax", VesselKind::Cruiser, 15.0, 15.0),
            vessel("Xerxes", VesselKind::Cruiser, 25.0, 25.0),
            vessel("Valdez", VesselKind::Tanker, 30.0, 30.0),
        ],
        groups: vec![],
    }
}

// ---------------------------------------------------------------------------
// Random scenarios
// ---------------------------------------------------------------------------

/// Depot names; no two share a prefix with each other or with `VESSEL_NAMES`.
const DEPOT_NAMES: [&str; 10] = [
    "Exxon", "Shell", "Bermuda", "Mobil", "Texaco", "Gulf", "Caltex", "Sunoco", "Valero",
    "Phillips",
];

const VESSEL_NAMES: [&str; 16] = [
    "Ajax", "Xerxes", "Queen", "Tiger", "Narwhal", "Orca", "Petrel", "Dolphin", "Kestrel",
    "Raven", "Ibis", "Wren", "Heron", "Lynx", "Falcon", "Zephyr",
];

/// Side of the square the generator scatters entities over.
pub const MAP_SIZE: f64 = 50.0;

fn random_point(rng: &mut impl Rng) -> Point {
    // whole-unit grid keeps generated scenarios readable
    Point::new(
        rng.gen_range(0.0..=MAP_SIZE).round(),
        rng.gen_range(0.0..=MAP_SIZE).round(),
    )
}

/// A random scenario with up to `depots` depots and `vessels` vessels.
///
/// Counts are capped by the available name pools. The same seed always
/// produces the same scenario.
pub fn generate_scenario(rng: &mut impl Rng, depots: usize, vessels: usize) -> Scenario {
    let mut depot_names = DEPOT_NAMES.to_vec();
    depot_names.shuffle(rng);
    let mut vessel_names = VESSEL_NAMES.to_vec();
    vessel_names.shuffle(rng);

    let depots = depot_names
        .into_iter()
        .take(depots)
        .map(|name| DepotDef {
            name: name.to_string(),
            position: random_point(rng),
            fuel: f64::from(rng.gen_range(5..=20_u32)) * 100.0,
            production_rate: f64::from(rng.gen_range(0..=4_u32)) * 50.0,
        })
        .collect();

    let vessels = vessel_names
        .into_iter()
        .take(vessels)
        .map(|name| {
            let kind = VesselKind::ALL[rng.gen_range(0..VesselKind::ALL.len())];
            VesselDef {
                name: name.to_string(),
                kind,
                position: random_point(rng),
            }
        })
        .collect();

    let scenario = Scenario {
        depots,
        vessels,
        groups: vec![],
    };
    validate_scenario(&scenario);
    scenario
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn depot_def(name: &str) -> DepotDef {
        DepotDef {
            name: name.to_string(),
            position: Point::new(0.0, 0.0),
            fuel: 100.0,
            production_rate: 0.0,
        }
    }

    fn vessel_def(name: &str, kind: VesselKind) -> VesselDef {
        VesselDef {
            name: name.to_string(),
            kind,
            position: Point::new(1.0, 1.0),
        }
    }

    #[test]
    fn test_default_scenario_is_valid() {
        validate_scenario(&default_scenario()); // should not panic
    }

    #[test]
    #[should_panic(expected = "collides with")]
    fn test_shared_prefix_panics() {
        let mut scenario = default_scenario();
        scenario.vessels.push(vessel_def("Exodus", VesselKind::Skimmer));
        validate_scenario(&scenario);
    }

    #[test]
    #[should_panic(expected = "at least two characters")]
    fn test_one_letter_name_panics() {
        let mut scenario = Scenario::default();
        scenario.depots.push(depot_def("X"));
        validate_scenario(&scenario);
    }

    #[test]
    #[should_panic(expected = "negative fuel")]
    fn test_negative_depot_fuel_panics() {
        let mut scenario = Scenario::default();
        scenario.depots.push(DepotDef {
            fuel: -1.0,
            ..depot_def("Exxon")
        });
        validate_scenario(&scenario);
    }

    #[test]
    #[should_panic(expected = "is not a known vessel or group")]
    fn test_unknown_group_member_panics() {
        let mut scenario = default_scenario();
        scenario.groups.push(GroupDef {
            name: "Navy".to_string(),
            members: vec!["Ghost".to_string()],
        });
        validate_scenario(&scenario);
    }

    #[test]
    #[should_panic(expected = "already belongs to another group")]
    fn test_member_in_two_groups_panics() {
        let mut scenario = default_scenario();
        for name in ["Navy", "Reserve"] {
            scenario.groups.push(GroupDef {
                name: name.to_string(),
                members: vec!["Ajax".to_string()],
            });
        }
        validate_scenario(&scenario);
    }

    #[test]
    #[should_panic(expected = "is not a known vessel or group")]
    fn test_depots_may_not_join_groups() {
        let mut scenario = default_scenario();
        scenario.groups.push(GroupDef {
            name: "Navy".to_string(),
            members: vec!["Exxon".to_string()],
        });
        validate_scenario(&scenario);
    }

    #[test]
    fn test_generated_scenario_is_deterministic_per_seed() {
        let a = generate_scenario(&mut ChaCha8Rng::seed_from_u64(7), 4, 6);
        let b = generate_scenario(&mut ChaCha8Rng::seed_from_u64(7), 4, 6);
        assert_eq!(a, b);
        assert_eq!(a.depots.len(), 4);
        assert_eq!(a.vessels.len(), 6);
    }

    #[test]
    fn test_generated_counts_are_capped_by_name_pools() {
        let scenario = generate_scenario(&mut ChaCha8Rng::seed_from_u64(1), 50, 50);
        assert_eq!(scenario.depots.len(), DEPOT_NAMES.len());
        assert_eq!(scenario.vessels.len(), VESSEL_NAMES.len());
        for vessel in &scenario.vessels {
            assert!(vessel.position.x >= 0.0 && vessel.position.x <= MAP_SIZE);
            assert!(vessel.position.y >= 0.0 && vessel.position.y <= MAP_SIZE);
        }
    }
}

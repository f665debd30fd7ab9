use serde::{Deserialize, Serialize};

use crate::navigation::Point;

// ---------------------------------------------------------------------------
// Newtype IDs
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(VesselId);
string_id!(DepotId);
string_id!(CommandId);

/// Fuel shortfalls below this are treated as a full tank or hold.
pub const FUEL_CLOSE_ENOUGH: f64 = 0.005;

/// Greatest range at which a stopped vessel may dock.
pub const DOCKING_RANGE: f64 = 0.1;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// An instruction addressed to a vessel, or fanned out through a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Order {
    CourseAndSpeed { course: f64, speed: f64 },
    PositionAndSpeed { position: Point, speed: f64 },
    DepotAndSpeed { depot: DepotId, speed: f64 },
    LoadAt { depot: DepotId },
    UnloadAt { depot: DepotId },
    DockAt { depot: DepotId },
    Attack { target: String },
    Refuel,
    Stop,
    StopAttack,
    StartSkimming { corner: Point, size: i64 },
}

impl Order {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CourseAndSpeed { .. } => "course",
            Self::PositionAndSpeed { .. } => "position",
            Self::DepotAndSpeed { .. } => "destination",
            Self::LoadAt { .. } => "load_at",
            Self::UnloadAt { .. } => "unload_at",
            Self::DockAt { .. } => "dock_at",
            Self::Attack { .. } => "attack",
            Self::Refuel => "refuel",
            Self::Stop => "stop",
            Self::StopAttack => "stop_attack",
            Self::StartSkimming { .. } => "start_skimming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Create {
        name: String,
        type_tag: String,
        position: Point,
    },
    CreateGroup {
        name: String,
    },
    AddToGroup {
        group: String,
        member: String,
    },
    RemoveFromGroup {
        group: String,
        member: String,
    },
    RemoveGroup {
        name: String,
    },
    RemoveVessel {
        name: String,
    },
    Issue {
        target: String,
        order: Order,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub id: CommandId,
    pub issued_tick: u64,
    pub execute_at_tick: u64,
    pub command: Command,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    Location { name: String, location: Point },
    Course { name: String, course: f64 },
    Speed { name: String, speed: f64 },
    Fuel { name: String, fuel: f64 },
    Removed { name: String },
}

impl Notification {
    pub fn subject(&self) -> &str {
        match self {
            Self::Location { name, .. }
            | Self::Course { name, .. }
            | Self::Speed { name, .. }
            | Self::Fuel { name, .. }
            | Self::Removed { name } => name,
        }
    }
}

/// Notifications queued while a command or tick runs.
pub type Outbox = Vec<Notification>;

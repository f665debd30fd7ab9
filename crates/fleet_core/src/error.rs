use thiserror::Error;

use crate::behavior::Capability;

pub type Result<T, E = FleetError> = std::result::Result<T, E>;

/// Coarse classification of [`FleetError`] used by callers that only care
/// about the category of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidState,
    SpeedExceeded,
    CannotDock,
    MustBeDocked,
    Engagement,
    InvalidRoute,
    NotSupported,
    StructuralError,
    UnknownEntity,
    NameCollision,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FleetError {
    #[error("{0} cannot move")]
    CannotMove(String),

    #[error("{vessel} cannot go that fast: {requested:.2} exceeds maximum {maximum:.2}")]
    SpeedExceeded {
        vessel: String,
        requested: f64,
        maximum: f64,
    },

    #[error("speed must not be negative, got {0:.2}")]
    InvalidSpeed(f64),

    #[error("{vessel} cannot dock at {depot}")]
    CannotDock { vessel: String, depot: String },

    #[error("{0} must be docked")]
    MustBeDocked(String),

    #[error("hit force must not be negative, got {0}")]
    InvalidForce(i32),

    #[error("{0} is not afloat")]
    NotAfloat(String),

    #[error("{0} already has cargo destinations")]
    CargoRouteActive(String),

    #[error("spill size must be positive, got {0}")]
    InvalidSpillSize(i64),

    #[error("already attacking {0}")]
    AlreadyEngaged(String),

    #[error("{0} was not attacking")]
    NotEngaged(String),

    #[error("{0} cannot attack itself")]
    SelfTarget(String),

    #[error("load and unload destinations must differ, both are {0}")]
    InvalidRoute(String),

    #[error("{vessel} cannot {capability}")]
    NotSupported {
        vessel: String,
        capability: Capability,
    },

    #[error("adding {child} to {group} would create a cycle")]
    CycleDetected { group: String, child: String },

    #[error("{0} already belongs to a group")]
    AlreadyHasParent(String),

    #[error("{group} has no member named {child}")]
    NoSuchChild { group: String, child: String },

    #[error("{0} is not an individual vessel")]
    NotAnIndividual(String),

    #[error("{0} is not a group")]
    NotAGroup(String),

    #[error("group {0} cannot be hit")]
    GroupCannotBeHit(String),

    #[error("no entity named {0}")]
    UnknownEntity(String),

    #[error("unrecognized type {0}")]
    UnknownType(String),

    #[error("name {0} is already in use or abbreviates an existing name")]
    NameCollision(String),

    #[error("invalid name {0:?}: names need at least two characters and no whitespace")]
    InvalidName(String),

    #[error("{member}: {source}")]
    MemberFailed {
        member: String,
        source: Box<FleetError>,
    },
}

impl FleetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CannotMove(_)
            | Self::InvalidSpeed(_)
            | Self::InvalidForce(_)
            | Self::NotAfloat(_)
            | Self::CargoRouteActive(_)
            | Self::InvalidSpillSize(_)
            | Self::SelfTarget(_) => ErrorKind::InvalidState,
            Self::SpeedExceeded { .. } => ErrorKind::SpeedExceeded,
            Self::CannotDock { .. } => ErrorKind::CannotDock,
            Self::MustBeDocked(_) => ErrorKind::MustBeDocked,
            Self::AlreadyEngaged(_) | Self::NotEngaged(_) => ErrorKind::Engagement,
            Self::InvalidRoute(_) => ErrorKind::InvalidRoute,
            Self::NotSupported { .. } => ErrorKind::NotSupported,
            Self::CycleDetected { .. }
            | Self::AlreadyHasParent(_)
            | Self::NoSuchChild { .. }
            | Self::NotAnIndividual(_)
            | Self::NotAGroup(_)
            | Self::GroupCannotBeHit(_) => ErrorKind::StructuralError,
            Self::UnknownEntity(_) | Self::UnknownType(_) => ErrorKind::UnknownEntity,
            Self::NameCollision(_) | Self::InvalidName(_) => ErrorKind::NameCollision,
            Self::MemberFailed { source, .. } => source.kind(),
        }
    }
}

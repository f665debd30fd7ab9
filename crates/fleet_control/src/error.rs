use fleet_core::FleetError;
use thiserror::Error;

/// A directive that could not be parsed, or that the world rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("{target} cannot be ordered to {verb}")]
    UnknownOrder { target: String, verb: String },
    #[error("{directive}: missing {argument}")]
    MissingArgument {
        directive: String,
        argument: &'static str,
    },
    #[error("{directive}: unexpected argument '{extra}'")]
    TrailingArgument { directive: String, extra: String },
    #[error("expected a number for {argument}, got '{value}'")]
    InvalidNumber {
        argument: &'static str,
        value: String,
    },
    #[error("course must be at least 0 and less than 360, got {0}")]
    CourseOutOfRange(f64),
    #[error("speed must not be negative, got {0}")]
    NegativeSpeed(f64),
    #[error(transparent)]
    Fleet(#[from] FleetError),
}

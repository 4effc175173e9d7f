use thiserror::Error;

/// RFC rule construction and validation errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Invalid recurrence spec: {0}")]
    InvalidSpec(#[from] SpecError),

    #[error(transparent)]
    CoreError(#[from] cadence_core::error::CoreError),
}

/// Reasons a recurrence rule is rejected before expansion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("{field} must not be empty when present")]
    EmptyConstraint { field: &'static str },

    #[error("{field} value {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("{field} must not be zero")]
    ZeroValue { field: &'static str },

    #[error("COUNT and UNTIL are mutually exclusive")]
    CountWithUntil,

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("INTERVAL={interval} never reaches the requested {field} values")]
    UnreachableTime { field: &'static str, interval: u32 },
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;

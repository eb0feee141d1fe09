use thiserror::Error;

/// Reasons a request is rejected before anything is enumerated or fetched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestError {
    #[error("Unknown ERA5 product '{0}' (expected land, single-levels or pressure-levels)")]
    UnknownProduct(String),

    #[error("Unknown resolution '{0}' (expected hourly or monthly)")]
    UnknownResolution(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("No temporal specification given: provide years, a range or composite timesteps")]
    MissingTemporalSpec,

    #[error("Conflicting temporal specifications: {0}")]
    ConflictingTemporalSpecs(&'static str),

    #[error("A range needs both a start and an end")]
    IncompleteRange,

    #[error("At least one variable must be requested")]
    NoVariables,

    #[error("Invalid variable name '{0}' (expected ASCII letters, digits, '_' or '.')")]
    InvalidVariable(String),

    #[error("{axis} value {value} is outside the valid range")]
    OutOfRange { axis: &'static str, value: u32 },

    #[error("Composite timesteps can only be requested at hourly resolution")]
    CompositeRequiresHourly,
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("simulation horizon must be at least one month")]
    ZeroHorizon,

    #[error("population is empty")]
    EmptyPopulation,

    #[error("duplicate household name: {0}")]
    DuplicateName(String),

    #[error("{name}: {trait_name} must lie in [0, 1], got {value}")]
    TraitOutOfRange {
        name: String,
        trait_name: &'static str,
        value: f64,
    },

    #[error("fixed cost {field} must be positive, got {value}")]
    NonPositiveCost { field: &'static str, value: f64 },

    #[error("range {field} is empty or inverted: [{low}, {high})")]
    InvalidRange {
        field: &'static str,
        low: f64,
        high: f64,
    },

    #[error("probability {field} must lie in [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("scripted source needs at least one draw")]
    EmptySequence,

    #[error("scripted draw must lie in [0, 1), got {0}")]
    DrawOutOfRange(f64),
}

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Runway would be infinite or NaN
    #[error("{name}: fixed monthly costs sum to zero")]
    ZeroMonthlyCosts { name: String },

    #[error("{name} is bankrupt and cannot be advanced")]
    AlreadyBankrupt { name: String },

    #[error("only {completed} of {requested} replications completed")]
    IncompleteComparison { requested: usize, completed: usize },

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error(transparent)]
    Parallel(#[from] des::parallel::ParallelError),
}

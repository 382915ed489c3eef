use thiserror::Error;

use crate::plan::{OpeningId, PointId, WallId};

/// Top-level error type for the Floorcraft drafting core.
#[derive(Debug, Error)]
pub enum FloorcraftError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric input values.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{parameter} must be positive, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("zero-length wall between {0:?} and {1:?}")]
    ZeroLengthWall(PointId, PointId),
}

/// Referential-integrity errors in the plan graph.
///
/// These indicate that a mutation broke an invariant upstream; callers should
/// treat them as programming errors rather than recoverable user input.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("point not found: {0:?}")]
    PointNotFound(PointId),

    #[error("wall not found: {0:?}")]
    WallNotFound(WallId),

    #[error("opening not found: {0:?}")]
    OpeningNotFound(OpeningId),

    #[error("inconsistent plan: {0}")]
    Inconsistent(String),
}

/// Errors related to drafting operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while loading or validating configuration and records.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`FloorcraftError`].
pub type Result<T> = std::result::Result<T, FloorcraftError>;

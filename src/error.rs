//! Error types.
//!
//! Two failure families exist: [`InputError`] for a malformed per-request
//! probability vector or ranking, and [`ConfigError`] for a taxonomy,
//! bias registry, or threshold set that cannot be used. Input errors are
//! returned to the caller of a single classification; configuration errors
//! surface once, when the engine is built.

use thiserror::Error;

/// A per-request input that violates the vector/ranking contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("probability vector is empty")]
    Empty,

    #[error("expected {expected} entries, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("confidence for class {class_id} is not finite")]
    NonFinite { class_id: usize },

    #[error("confidence {value} for class {class_id} is outside [0, 1]")]
    OutOfRange { class_id: usize, value: f64 },

    #[error("class id {class_id} is not in the taxonomy")]
    UnknownClass { class_id: usize },

    #[error("ranking is not in descending confidence order at class {class_id}")]
    Unordered { class_id: usize },

    #[error("probabilities sum to {sum}, outside tolerance {tolerance} of 1.0")]
    BadSum { sum: f64, tolerance: f64 },
}

/// A configuration problem detected while building an engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("taxonomy must contain at least {min} classes, got {actual}")]
    TaxonomyTooSmall { min: usize, actual: usize },

    #[error("taxonomy class ids must be contiguous from 0; expected {expected}, got {actual}")]
    NonContiguousClassId { expected: usize, actual: usize },

    #[error("taxonomy label for class {class_id} is empty")]
    EmptyLabel { class_id: usize },

    #[error("taxonomy label {label:?} is assigned to more than one class")]
    DuplicateLabel { label: String },

    #[error("bias registry label {label:?} is not in the taxonomy")]
    UnknownBiasLabel { label: String },

    #[error("{name} must be in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("{0}")]
    InconsistentThresholds(String),

    #[error("invalid value {value:?} for environment variable {var}")]
    InvalidEnvOverride { var: String, value: String },

    #[error("failed to read settings from {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse settings: {0}")]
    Parse(String),
}

/// Any error produced by this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, CalibrationError>;

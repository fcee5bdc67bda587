//! Error types
//!
//! Busy resources are not errors: learning that cannot happen yet is a
//! silent no-op. Everything here is raised synchronously and leaves the
//! model and field exactly as they were before the failing call.

use thiserror::Error;

use crate::clock::Time;
use crate::pattern::Modality;

/// Main error type for model and field operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChrestError {
    /// A batch of object moves was rejected as a whole.
    #[error("Illegal move: {0}")]
    IllegalMove(#[from] MoveViolation),

    /// Two simultaneously live, concrete objects share an identifier.
    #[error("Duplicate object identifier {identifier:?}")]
    DuplicateIdentifier { identifier: String },

    /// Two scenes of differing size were compared.
    #[error("Dimension mismatch: {width}x{height} compared with {other_width}x{other_height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        other_width: usize,
        other_height: usize,
    },

    /// Attention is not free at the requested time.
    #[error("Attention busy until {free_at}, requested at {requested}")]
    AttentionBusy { requested: Time, free_at: Time },

    /// A coordinate outside a scene was addressed.
    #[error("Square ({col}, {row}) is outside the scene")]
    OutOfBounds { col: i32, row: i32 },

    /// The active reinforcement theory rejected the variables supplied.
    #[error("Reinforcement theory {theory} rejected {got} variables")]
    IncorrectVariableCount { theory: &'static str, got: usize },

    /// Reinforcement was requested before any theory was selected.
    #[error("No reinforcement learning theory selected")]
    NoReinforcementTheory,

    /// A node of the wrong modality was supplied.
    #[error("Expected a {expected} node, got a {found} node")]
    ModalityMismatch { expected: Modality, found: Modality },

    /// A node id that does not belong to this model.
    #[error("Node {0} not found")]
    UnknownNode(usize),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Reasons a batch of object moves is illegal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveViolation {
    #[error("attention busy until {free_at}, requested at {requested}")]
    AttentionBusy { requested: Time, free_at: Time },

    #[error("sequence {sequence} has fewer than two waypoints")]
    IncompleteSequence { sequence: usize },

    #[error("sequence {sequence} mixes object {expected:?} with {found:?}")]
    NonSerial {
        sequence: usize,
        expected: String,
        found: String,
    },

    #[error("sequence {sequence}: object {identifier:?} already moved by sequence {first}")]
    RepeatedObject {
        sequence: usize,
        first: usize,
        identifier: String,
    },

    #[error("sequence {sequence}: object {identifier:?} is not at ({col}, {row})")]
    InitialLocation {
        sequence: usize,
        identifier: String,
        col: i32,
        row: i32,
    },

    #[error("sequence {sequence}: object {identifier:?} is no longer at ({col}, {row})")]
    NotAtLocation {
        sequence: usize,
        identifier: String,
        col: i32,
        row: i32,
    },
}

/// Result type for model and field operations.
pub type ChrestResult<T> = Result<T, ChrestError>;

impl ChrestError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Is this a rejected move batch?
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, Self::IllegalMove(_))
    }
}

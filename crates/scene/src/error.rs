//! Scene graph error types.

use std::fmt;

use thiserror::Error;

use crate::node::NodeId;

/// Which ordered collection an index referred to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    /// A node's child list
    Children,
    /// A node's scene objects
    SceneObjects,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Children => f.write_str("child"),
            Collection::SceneObjects => f.write_str("scene object"),
        }
    }
}

/// Error type for scene graph operations.
#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    /// Index-based access or removal past the end of a collection.
    #[error("{kind} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// Collection that was indexed.
        kind: Collection,
        /// Requested index.
        index: usize,
        /// Collection length at the time of the call.
        len: usize,
    },

    /// A light pass met more point lights than the shader has slots for.
    #[error("Too many point lights: at most {max} can be drawn")]
    LightBudgetExceeded {
        /// Configured maximum.
        max: usize,
    },

    /// Inverse requested for a singular matrix.
    #[error("Transform is not invertible (determinant {determinant})")]
    NotInvertible {
        /// Determinant of the rejected matrix.
        determinant: f32,
    },

    /// Scene configuration that no tree can run with.
    #[error("Invalid scene config: {0}")]
    InvalidConfig(String),

    /// The handle refers to a node that was removed, or was minted by another tree.
    #[error("Node {0:?} does not exist in this tree")]
    NodeNotFound(NodeId),
}

impl SceneError {
    pub(crate) fn out_of_bounds(kind: Collection, index: usize, len: usize) -> Self {
        SceneError::IndexOutOfBounds { kind, index, len }
    }
}

impl From<SceneError> for arbor_core::Error {
    fn from(err: SceneError) -> Self {
        arbor_core::Error::Scene(err.to_string())
    }
}

/// Result type alias for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

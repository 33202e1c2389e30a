//! Error taxonomy for interior management.
//!
//! None of these abort the host: callers log them and degrade to a stale or
//! missing interior.

use engine_core::PartId;
use std::fmt;
use thiserror::Error;

/// What kind of named asset failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Node,
    Shader,
    Camera,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetKind::Node => "scene node",
            AssetKind::Shader => "shader",
            AssetKind::Camera => "camera",
        })
    }
}

/// A failure reported by the host itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteriorError {
    /// A named node, shader or camera was not found. Only that item is skipped.
    #[error("{kind} `{name}` not found")]
    AssetLookup { kind: AssetKind, name: String },

    /// The host failed to build the interior model. Retried on the next tick.
    #[error("could not construct interior model of {part}: {source}")]
    ModelConstruction {
        part: PartId,
        #[source]
        source: HostError,
    },

    /// The compartment has no interior model although it should always have one.
    #[error("{part} has no interior model")]
    MissingModel { part: PartId },

    #[error(transparent)]
    Host(#[from] HostError),
}

impl InteriorError {
    pub fn asset(kind: AssetKind, name: impl Into<String>) -> Self {
        Self::AssetLookup {
            kind,
            name: name.into(),
        }
    }
}

pub type Result<T, E = InteriorError> = std::result::Result<T, E>;

//! Error types for classification.

use crate::entity::Entity;
use std::time::Duration;

/// An error aborting classification.
///
/// Inputs the classifier cannot interpret are never errors: unsupported expressions are
/// skipped. Only an inconsistent hierarchy or an exhausted budget stop classification.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ClassifierError {
    /// An entity ended up in its own ancestor closure.
    #[error("Circular subsumption detected: {entity} is one of its own ancestors")]
    CircularSubsumption { entity: Entity },

    /// The fixpoint loop did not converge within the configured number of passes.
    #[error("Classification did not converge within {limit} passes")]
    PassLimitExceeded { limit: usize },

    /// The fixpoint loop did not converge within the configured time.
    #[error("Classification timeout exceeded ({timeout:?})")]
    Timeout { timeout: Duration },
}

impl ClassifierError {
    /// Creates a circular subsumption error.
    pub fn circular_subsumption(entity: impl Into<Entity>) -> Self {
        Self::CircularSubsumption {
            entity: entity.into(),
        }
    }

    /// Returns the offending entity if this is a circular subsumption error.
    pub fn entity(&self) -> Option<&Entity> {
        match self {
            Self::CircularSubsumption { entity } => Some(entity),
            Self::PassLimitExceeded { .. } | Self::Timeout { .. } => None,
        }
    }
}

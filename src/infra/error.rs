use std::error::Error;
use std::fmt;

use crate::infra::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The knowledge map cannot be built from an empty tile set.
    EmptyLayout,
    /// Every objective is exhausted or unreachable.
    NoPlanAvailable { position: Position },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NavigationError::EmptyLayout => {
                write!(formatter, "Cannot build knowledge map from an empty layout")
            }
            NavigationError::NoPlanAvailable { position } => {
                write!(formatter, "No reachable objective from {}", position)
            }
        }
    }
}

impl Error for NavigationError {}

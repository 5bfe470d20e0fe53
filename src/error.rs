//! Error types for routing and allocation

use crate::fleet::types::AgentId;
use thiserror::Error;

/// Errors that can occur while ordering routes or allocating tasks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Cannot allocate tasks to an empty fleet")]
    EmptyFleet,
    #[error("Unknown agent: {0}")]
    UnknownAgent(AgentId),
    #[error("{strategy} routing needs at least {required} tasks, got {found}")]
    InsufficientTasks {
        strategy: &'static str,
        required: usize,
        found: usize,
    },
    #[error("Route computation failed: {0}")]
    RouteComputation(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    /// True for failures of the approximate router that a caller may recover
    /// from by switching to an exact or greedy ordering.
    pub fn is_route_failure(&self) -> bool {
        matches!(
            self,
            Self::RouteComputation(_) | Self::InsufficientTasks { .. }
        )
    }
}

/// A specialized Result type for routing and allocation
pub type Result<T> = std::result::Result<T, Error>;

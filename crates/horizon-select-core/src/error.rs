//! Error types for Horizon Select hosts.

use thiserror::Error;

use crate::node::NodeError;

/// The main error type for host operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Node-related error.
    #[error("Node error: {0}")]
    Node(#[from] NodeError),
    /// The portal handle is invalid or has already been unmounted.
    #[error("Invalid or unmounted portal handle")]
    InvalidPortal,
}

/// A specialized Result type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;

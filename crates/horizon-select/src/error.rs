//! Error types for the select widget.

use horizon_select_core::{HostError, NodeError};
use thiserror::Error;

use crate::option_id::OptionId;

/// Errors that can occur while building or driving a select.
#[derive(Debug, Error)]
pub enum SelectError {
    /// Node tree operation failed.
    #[error("Node error: {0}")]
    Node(#[from] NodeError),
    /// The host rejected an operation.
    #[error("Host error: {0}")]
    Host(#[from] HostError),
    /// The configuration could not be parsed.
    #[error("Invalid select configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// The part must be attached first.
    #[error("Part is not attached")]
    PartDetached,
    /// No option with this id has been registered.
    #[error("No option registered with id {0}")]
    UnknownOption(OptionId),
}

/// A specialized Result type for select operations.
pub type SelectResult<T> = std::result::Result<T, SelectError>;

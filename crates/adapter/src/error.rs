//! Adapter error types.

/// A client line that could not be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ProtocolError {
    #[display("malformed message: {detail}")]
    Malformed { detail: String },
    #[display("unknown message type '{name}'")]
    UnknownType { name: String },
    #[display("unknown action '{name}'")]
    UnknownAction { name: String },
    #[display("unknown side '{name}'")]
    UnknownSide { name: String },
}

impl ProtocolError {
    /// Stable machine-readable code for error replies.
    pub fn code(&self) -> &'static str {
        match self {
            ProtocolError::Malformed { .. } => "malformed",
            ProtocolError::UnknownType { .. } => "unknown_type",
            ProtocolError::UnknownAction { .. } => "unknown_action",
            ProtocolError::UnknownSide { .. } => "unknown_side",
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Malformed {
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RuntimeError {
    /// The game task is gone; no further commands can be delivered.
    #[display("game task has stopped")]
    Stopped,
    #[display("game task failed: {_0}")]
    Join(tokio::task::JoinError),
}

impl From<tokio::task::JoinError> for RuntimeError {
    fn from(err: tokio::task::JoinError) -> Self {
        RuntimeError::Join(err)
    }
}

use thiserror::Error;

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors raised for malformed input. Per-slot failures never surface here;
/// they are recorded in a [`crate::SlotReport`].
#[derive(Error, Debug)]
pub enum SceneError {
    /// Node id does not belong to this tree
    #[error("Unknown node id: {0}")]
    UnknownNode(u32),

    /// Path did not resolve to any node
    #[error("Node not found at path: {0}")]
    PathNotFound(String),

    /// Slot name not declared by the host's slot table
    #[error("Slot `{slot}` is not declared by host type `{host_type}`")]
    UnknownSlot { host_type: String, slot: String },

    /// Host type has no registered slot table
    #[error("No slot table registered for host type: {0}")]
    UnknownHostType(String),

    /// Slot table registered twice
    #[error("Slot table already registered for host type: {0}")]
    DuplicateHostType(String),

    /// Scene document is structurally invalid
    #[error("Invalid scene document: {0}")]
    InvalidDocument(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SceneError {
    /// Create an invalid document error
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

//! Error types for content loading and session progression.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the progression engine when an operation is called out of
/// sequence or with an out-of-range choice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The operation is not permitted in the current state.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// The choice index does not exist on the current item.
    #[error("choice {choice} is out of range (item has {len} choices)")]
    ChoiceOutOfRange { choice: usize, len: usize },
}

impl EngineError {
    pub(crate) fn invalid(operation: &'static str, state: &'static str) -> Self {
        EngineError::InvalidState { operation, state }
    }
}

/// Errors raised while building, loading, or looking up topics.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No topic is registered under the key.
    #[error("topic not found: {0}")]
    NotFound(String),

    /// A topic with this key is already registered.
    #[error("duplicate topic key: {0}")]
    DuplicateTopic(String),

    /// Topic keys must be non-blank.
    #[error("topic key is empty")]
    EmptyKey,

    /// A topic must contain at least one item.
    #[error("topic '{0}' has no items")]
    EmptyTopic(String),

    /// An item must offer at least one choice.
    #[error("item {item_id} has no choices")]
    EmptyChoices { item_id: u32 },

    /// The correct choice index points past the end of the choice list.
    #[error("item {item_id}: correct choice {index} is out of range ({len} choices)")]
    CorrectChoiceOutOfRange { item_id: u32, index: usize, len: usize },

    /// Per-choice correctness flags disagree with the correct choice index.
    #[error("item {item_id}: exactly one choice must be marked correct, at index {index}")]
    CorrectFlagMismatch { item_id: u32, index: usize },

    /// Two items in the same topic share an id.
    #[error("topic '{topic}' has duplicate item id {item_id}")]
    DuplicateItemId { topic: String, item_id: u32 },

    /// The `kind` field is neither `quiz` nor `drill`.
    #[error("unknown topic kind: {0}")]
    UnknownKind(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ContentError {
    /// Returns `true` for lookup misses, as opposed to malformed content.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound(_))
    }
}

//! Error types for the events crate.

use thiserror::Error;

use crate::shape::Shape;
use crate::signature::BindError;

/// Result type alias for event operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Event error types.
#[derive(Debug, Error)]
pub enum Error {
    /// The publisher type declares no event with this name.
    #[error("'{publisher}' declares no event named '{event}'")]
    UnknownEvent {
        event: String,
        publisher: &'static str,
    },

    /// A listener's shape differs from the shape declared by its event.
    #[error("listener ({found}) cannot be connected to '{event}' ({expected})")]
    SignatureMismatch {
        event: String,
        expected: Shape,
        found: Shape,
    },

    /// Call arguments do not fit the parameters of the target callable.
    #[error("cannot call '{target}': {source}")]
    ArgumentBinding {
        target: String,
        #[source]
        source: BindError,
    },

    /// A signature repeats a parameter name.
    #[error("invalid signature for '{event}': {source}")]
    InvalidSignature {
        event: String,
        #[source]
        source: BindError,
    },

    /// The candidate listener carries no parameter metadata.
    #[error("listener for '{event}' has no signature metadata")]
    UnsupportedCallableKind { event: String },

    /// A connected listener failed while being notified.
    #[error("listener for '{event}' failed: {source}")]
    Listener {
        event: String,
        #[source]
        source: anyhow::Error,
    },

    /// The publisher's default reaction failed.
    #[error("default reaction of '{event}' failed: {source}")]
    Reaction {
        event: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    /// Create an unknown event error.
    pub fn unknown_event(event: impl Into<String>, publisher: &'static str) -> Self {
        Self::UnknownEvent {
            event: event.into(),
            publisher,
        }
    }

    /// Create a signature mismatch error.
    pub fn signature_mismatch(event: impl Into<String>, expected: Shape, found: Shape) -> Self {
        Self::SignatureMismatch {
            event: event.into(),
            expected,
            found,
        }
    }

    /// Create an argument binding error.
    pub fn argument_binding(target: impl Into<String>, source: BindError) -> Self {
        Self::ArgumentBinding {
            target: target.into(),
            source,
        }
    }

    /// Create an invalid signature error.
    pub fn invalid_signature(event: impl Into<String>, source: BindError) -> Self {
        Self::InvalidSignature {
            event: event.into(),
            source,
        }
    }

    /// Create an unsupported callable error.
    pub fn unsupported_callable(event: impl Into<String>) -> Self {
        Self::UnsupportedCallableKind {
            event: event.into(),
        }
    }

    /// Wrap a listener failure.
    pub fn listener(event: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Listener {
            event: event.into(),
            source,
        }
    }

    /// Wrap a default reaction failure.
    pub fn reaction(event: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Reaction {
            event: event.into(),
            source,
        }
    }

    /// Short stable label for logs.
    pub const fn as_label(&self) -> &'static str {
        match self {
            Self::UnknownEvent { .. } => "unknown_event",
            Self::SignatureMismatch { .. } => "signature_mismatch",
            Self::ArgumentBinding { .. } => "argument_binding",
            Self::InvalidSignature { .. } => "invalid_signature",
            Self::UnsupportedCallableKind { .. } => "unsupported_callable",
            Self::Listener { .. } => "listener_failed",
            Self::Reaction { .. } => "reaction_failed",
        }
    }
}

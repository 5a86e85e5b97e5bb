/// Convenience result type used across the crate.
pub type SkylineResult<T> = Result<T, SkylineError>;

/// Top-level error taxonomy. Every variant is fatal to a run.
#[derive(thiserror::Error, Debug)]
pub enum SkylineError {
    /// Degenerate or inconsistent configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Font resource missing, unreadable, or not a usable font.
    #[error("font load error: {0}")]
    FontLoad(String),

    /// Frame sink or animation encoder failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SkylineError {
    /// Build a [`SkylineError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SkylineError::FontLoad`] value.
    pub fn font_load(msg: impl Into<String>) -> Self {
        Self::FontLoad(msg.into())
    }

    /// Build a [`SkylineError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SkylineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

/// Convenience result type used across meshoverlay.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Error taxonomy for the mesh stages.
///
/// None of these escape [`crate::OverlayRenderer::render`]; they are converted into a fallback
/// reason and recorded in [`crate::Diagnostics`].
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// Wrong vertex/face counts, out-of-range indices or a malformed camera.
    #[error("structural error: {0}")]
    Structural(String),

    /// Non-finite or degenerate numbers that could not be excluded locally.
    #[error("numeric degeneracy: {0}")]
    Numeric(String),

    /// An optional rasterization backend is not compiled in.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Unexpected failure inside a mesh stage.
    #[error("catastrophic failure: {0}")]
    Catastrophic(String),

    /// Invalid renderer configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing boundary data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build an [`OverlayError::Structural`] value.
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    /// Build an [`OverlayError::Numeric`] value.
    pub fn numeric(msg: impl Into<String>) -> Self {
        Self::Numeric(msg.into())
    }

    /// Build an [`OverlayError::BackendUnavailable`] value.
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Build an [`OverlayError::Catastrophic`] value.
    pub fn catastrophic(msg: impl Into<String>) -> Self {
        Self::Catastrophic(msg.into())
    }

    /// Build an [`OverlayError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`OverlayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

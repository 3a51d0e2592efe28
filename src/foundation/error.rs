/// Convenience result type used across figdom.
pub type FigdomResult<T> = Result<T, FigdomError>;

/// Top-level error taxonomy used by conversion APIs.
///
/// Malformed-but-structurally-valid input never produces an error: unsupported variants become
/// warnings, bad numbers are coerced and missing assets get placeholders. Errors are reserved for
/// input the converter cannot walk at all and for collaborator failures.
#[derive(thiserror::Error, Debug)]
pub enum FigdomError {
    /// Structurally invalid document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Failures reported by the asset export collaborator.
    #[error("asset error: {0}")]
    Asset(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FigdomError {
    /// Build a [`FigdomError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FigdomError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`FigdomError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }
}

impl From<serde_json::Error> for FigdomError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

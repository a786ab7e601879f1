/// Convenience result type used across stereoloop.
pub type StereoResult<T> = Result<T, StereoError>;

/// Top-level error taxonomy used by the generator, player and exporters.
#[derive(thiserror::Error, Debug)]
pub enum StereoError {
    /// Required depth maps, textures or generated frames are absent.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// A numeric parameter (strip count, scale, multiplier, frame rate, ...) is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Derived image geometry is degenerate (e.g. a strip narrower than one pixel).
    #[error("geometry violation: {0}")]
    GeometryViolation(String),

    /// The external encoder could not produce output.
    #[error("encoding failure: {0}")]
    EncodingFailure(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StereoError {
    /// Build a [`StereoError::MissingInput`] value.
    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    /// Build a [`StereoError::InvalidParameter`] value.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a [`StereoError::GeometryViolation`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::GeometryViolation(msg.into())
    }

    /// Build a [`StereoError::EncodingFailure`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::EncodingFailure(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

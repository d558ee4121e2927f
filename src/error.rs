use thiserror::Error;

/// Errors surfaced by the convolution engine and its collaborators.
///
/// Every variant is a caller error: nothing here is transient, so nothing is
/// retried or logged before being returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvolutionError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("spherical harmonic order must be even, got {0}")]
    OddShOrder(usize),

    #[error("shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown sphere `{0}`")]
    UnknownSphere(String),

    #[error("spherical harmonic basis cannot be inverted on this sphere: {0}")]
    SingularBasis(String),
}

pub type Result<T> = std::result::Result<T, ConvolutionError>;

impl ConvolutionError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

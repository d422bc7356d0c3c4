//! Profile model error types

use thiserror::Error;

use crate::extension::InvalidHandlerKey;

/// Errors raised while building or mutating a profile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Missing required field or a field with the wrong shape
    #[error("Invalid profile data: {0}")]
    Validation(String),

    /// Icon reference names a resource that does not exist
    #[error("Unknown resource '{0}'")]
    UnknownResource(String),

    /// Icon reference uses a namespace other than `source.`
    #[error("Unsupported resource reference '{0}': expected 'source.<name>'")]
    InvalidResourceNamespace(String),

    /// Owning handler reference is not a `source.TypeName` pair
    #[error(transparent)]
    HandlerReference(#[from] InvalidHandlerKey),

    /// A setter received a value of the wrong type
    #[error("Profile.{field} must be {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// A setter was asked for a field outside the mutable surface
    #[error("Profile has no settable field '{0}'")]
    UnknownField(String),
}

impl ModelError {
    /// True for errors that make input data unusable at load time
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ModelError::TypeMismatch { .. } | ModelError::UnknownField(_)
        )
    }
}

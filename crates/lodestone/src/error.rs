//! Error types for the Lodestone facade.

use lodestone_kernel::KernelError;

/// Convenience alias for facade results.
pub type Result<T> = std::result::Result<T, LodestoneError>;

/// Errors surfaced by the factory facade.
///
/// Kernel rejections pass through unchanged so callers can match on the
/// full [`KernelError`] taxonomy. The facade itself only adds failures
/// of its own machinery, reported as [`LodestoneError::Internal`].
#[derive(thiserror::Error, Debug)]
pub enum LodestoneError {
    /// The kernel rejected a command. The committed state is unchanged.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// The facade itself failed (lock poisoning and similar). The
    /// committed state may no longer be reachable.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LodestoneError {
    /// Creates an internal error from any printable cause.
    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        LodestoneError::Internal(msg.into())
    }

    /// True when the error is a kernel rejection rather than a facade
    /// failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, LodestoneError::Kernel(_))
    }
}

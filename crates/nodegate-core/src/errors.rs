use thiserror::Error;

/// Core error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A global ID could not be decoded into typed components.
    #[error("invalid global id: {0}")]
    InvalidId(#[from] nodegate_canonical::DecodeError),
    /// An event without a check result was addressed as a check event.
    #[error("event on entity '{entity}' has no check result")]
    MissingCheck {
        /// Entity the event belongs to.
        entity: String,
    },
}

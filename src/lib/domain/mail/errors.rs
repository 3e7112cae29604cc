//! Error types for mail composition and delivery

use lettre::{address::AddressError, error::Error as LettreError};
use thiserror::Error;

use super::value_objects::email_address::EmailAddressError;

/// Errors surfaced by transport implementations
#[derive(Debug, Error)]
pub enum TransportError {
    /// An error occurred while sending the message
    #[error("An error occurred while sending the message")]
    SendError,

    /// Invalid email address
    #[error("Invalid email address")]
    InvalidAddress,

    /// The body could not be rendered while preparing the message
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for TransportError {
    fn from(err: anyhow::Error) -> Self {
        TransportError::UnknownError(err)
    }
}

impl From<AddressError> for TransportError {
    fn from(_err: AddressError) -> Self {
        TransportError::InvalidAddress
    }
}

impl From<LettreError> for TransportError {
    fn from(err: LettreError) -> Self {
        TransportError::UnknownError(err.into())
    }
}

/// Errors surfaced by the templating collaborator
#[derive(Debug, Error)]
pub enum RenderError {
    /// No template exists under the given name
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// The engine failed to render the template
    #[error(transparent)]
    RenderFailure(anyhow::Error),
}

/// Errors returned by `MessageComposer::send`
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A resolved override produced an invalid email address
    #[error("invalid email address in resolved override")]
    Address(#[from] EmailAddressError),

    /// The transport failed to deliver; fatal for this invocation
    #[error("transport failed to deliver the message")]
    Transport(#[from] TransportError),
}

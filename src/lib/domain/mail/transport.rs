//! Delivery seam

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::errors::TransportError;
use super::message::Message;

/// Delivers a composed message.
///
/// The composer does not inspect the outcome beyond error propagation: a
/// successful return means "the send was attempted", nothing more. Retries,
/// timeouts and partial-failure policies belong to implementations.
#[async_trait]
pub trait MailTransport: Clone + Send + Sync + 'static {
    /// Hand the message to the underlying delivery mechanism.
    ///
    /// # Arguments
    /// * `message` - The composed [`Message`] to deliver.
    ///
    /// # Returns
    /// A [`Result`] indicating whether the attempt failed fatally.
    async fn deliver(&self, message: &Message) -> Result<(), TransportError>;
}

#[cfg(test)]
mock! {
    pub MailTransport {}

    impl Clone for MailTransport {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MailTransport for MailTransport {
        async fn deliver(&self, message: &Message) -> Result<(), TransportError>;
    }
}

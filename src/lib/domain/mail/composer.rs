//! Message composition pipeline

use std::sync::Arc;

use super::errors::ComposeError;
use super::events::{AfterSendEvent, BeforeSendEvent, SendLifecycle, SendSubscriber};
use super::message::{BodyFormat, Message};
use super::overlay::{keys, trim_split, ConfigOverlay};
use super::resolver::{OverlayResolver, ResolveContext};
use super::transport::MailTransport;
use super::value_objects::named_address::NamedAddress;
use super::variables::VariableBag;

/// Variable key under which embedded-image handles are exposed to
/// templates.
pub const EMBED_IMAGES_VARIABLE: &str = "embedImages";

/// Composes a template-bound message, applies the overlay override chain
/// and dispatches the result through the transport collaborator.
///
/// One `send` call runs start-to-finish on the calling task; the only await
/// point is the transport call. The composer holds no per-send state, so a
/// shared instance may serve overlapping sends when its collaborators do.
#[derive(Clone, Debug)]
pub struct MessageComposer<R, T>
where
    R: OverlayResolver,
    T: MailTransport,
{
    resolver: Arc<R>,
    transport: Arc<T>,
    lifecycle: SendLifecycle,
}

impl<R, T> MessageComposer<R, T>
where
    R: OverlayResolver,
    T: MailTransport,
{
    /// Creates a new composer.
    pub fn new(resolver: Arc<R>, transport: Arc<T>) -> Self {
        Self {
            resolver,
            transport,
            lifecycle: SendLifecycle::new(),
        }
    }

    /// Registers a lifecycle subscriber; subscribers run in registration
    /// order.
    pub fn subscribe(&mut self, subscriber: Arc<dyn SendSubscriber>) {
        self.lifecycle.subscribe(subscriber);
    }

    /// Composes and dispatches one templated message.
    ///
    /// # Arguments
    /// * `template` - Name of the template the transport renders the body from.
    /// * `receivers` - Ordered "to" address/name pairs; may be empty.
    /// * `senders` - Ordered "from" address/name pairs; transports honor only the first.
    /// * `subject` - Subject line, unless overridden by the overlay.
    /// * `variables` - Variables for the templating collaborator; augmented in
    ///   place with [`EMBED_IMAGES_VARIABLE`] when images are embedded.
    /// * `overlay` - Per-send configuration overlay.
    ///
    /// # Returns
    /// - [`Ok`]`(true)` once a send was attempted, regardless of what the
    ///   transport reports internally.
    /// - [`Ok`]`(false)` when the enable gate resolves falsy or `receivers`
    ///   is empty; nothing else happens in that case.
    /// - [`Err`] when the transport fails or a resolved override produces an
    ///   invalid address; no retry is attempted.
    pub async fn send(
        &self,
        template: &str,
        receivers: &[NamedAddress],
        senders: &[NamedAddress],
        subject: &str,
        variables: &mut VariableBag,
        overlay: &ConfigOverlay,
    ) -> Result<bool, ComposeError> {
        if !self.is_send_enabled(overlay, receivers) {
            tracing::debug!(template, "sending disabled by overlay or empty recipient list");
            return Ok(false);
        }

        let context = self.resolve_context(variables);
        let mut message = Message::new();
        self.embed_images(overlay, &context, variables, &mut message);
        self.prepare_message(template, receivers, senders, subject, variables, &mut message);
        self.override_receiver(overlay, &context, &mut message)?;
        self.override_sender(overlay, &context, &mut message)?;
        self.override_subject(overlay, &context, &mut message);
        self.override_cc(overlay, &context, &mut message)?;
        self.override_priority(overlay, &context, &mut message);
        self.override_attachments(overlay, &context, &mut message);

        self.lifecycle.notify_before(&mut BeforeSendEvent {
            message: &mut message,
            variables: &*variables,
        });
        self.transport.deliver(&message).await?;
        self.lifecycle.notify_after(&AfterSendEvent {
            message: &message,
            variables: &*variables,
        });

        tracing::info!(template, recipients = message.to.len(), "message dispatched");
        Ok(true)
    }

    /// The enable gate runs before context priming, so its expression sees
    /// an empty context. `"0"` counts as disabled, matching the falsy
    /// convention of the configuration layer.
    fn is_send_enabled(&self, overlay: &ConfigOverlay, receivers: &[NamedAddress]) -> bool {
        let enabled = self
            .resolved(overlay, &ResolveContext::empty(), keys::ENABLE)
            .is_some_and(|value| value != "0");
        enabled && !receivers.is_empty()
    }

    fn resolve_context(&self, variables: &VariableBag) -> ResolveContext {
        match variables.user_properties() {
            Some(properties) => ResolveContext::from_properties(properties.clone()),
            None => ResolveContext::empty(),
        }
    }

    /// Resolves one overlay key; `None` when the key is absent or resolves
    /// empty.
    fn resolved(
        &self,
        overlay: &ConfigOverlay,
        context: &ResolveContext,
        key: &str,
    ) -> Option<String> {
        let raw = overlay.get(key)?;
        let value = self.resolver.resolve(raw, context);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn embed_images(
        &self,
        overlay: &ConfigOverlay,
        context: &ResolveContext,
        variables: &mut VariableBag,
        message: &mut Message,
    ) {
        let Some(resolved) = self.resolved(overlay, context, keys::EMBED_IMAGE) else {
            return;
        };
        let handles: Vec<String> = trim_split(&resolved)
            .into_iter()
            .map(|path| message.embed_from_path(path))
            .collect();
        variables.set(EMBED_IMAGES_VARIABLE, handles);
    }

    fn prepare_message(
        &self,
        template: &str,
        receivers: &[NamedAddress],
        senders: &[NamedAddress],
        subject: &str,
        variables: &VariableBag,
        message: &mut Message,
    ) {
        for receiver in receivers {
            message.to(receiver.clone());
        }
        for sender in senders {
            message.from(sender.clone());
        }

        message
            .subject(subject)
            .set_template(template)
            .format(BodyFormat::Html)
            .html("")
            .assign_variables(variables.clone());
    }

    fn override_receiver(
        &self,
        overlay: &ConfigOverlay,
        context: &ResolveContext,
        message: &mut Message,
    ) -> Result<(), ComposeError> {
        if let (Some(email), Some(name)) = (
            self.resolved(overlay, context, keys::RECEIVER_EMAIL),
            self.resolved(overlay, context, keys::RECEIVER_NAME),
        ) {
            message.to(NamedAddress::new(&email, &name)?);
        }
        Ok(())
    }

    fn override_sender(
        &self,
        overlay: &ConfigOverlay,
        context: &ResolveContext,
        message: &mut Message,
    ) -> Result<(), ComposeError> {
        if let (Some(email), Some(name)) = (
            self.resolved(overlay, context, keys::SENDER_EMAIL),
            self.resolved(overlay, context, keys::SENDER_NAME),
        ) {
            message.from(NamedAddress::new(&email, &name)?);
        }
        Ok(())
    }

    fn override_subject(
        &self,
        overlay: &ConfigOverlay,
        context: &ResolveContext,
        message: &mut Message,
    ) {
        if let Some(subject) = self.resolved(overlay, context, keys::SUBJECT) {
            message.subject(subject);
        }
    }

    fn override_cc(
        &self,
        overlay: &ConfigOverlay,
        context: &ResolveContext,
        message: &mut Message,
    ) -> Result<(), ComposeError> {
        if let Some(address) = self.resolved(overlay, context, keys::CC) {
            message.cc(NamedAddress::bare(&address)?);
        }
        Ok(())
    }

    fn override_priority(
        &self,
        overlay: &ConfigOverlay,
        context: &ResolveContext,
        message: &mut Message,
    ) {
        if let Some(priority) = self.resolved(overlay, context, keys::PRIORITY) {
            // non-numeric values coerce to 0
            message.priority(priority.trim().parse().unwrap_or(0));
        }
    }

    fn override_attachments(
        &self,
        overlay: &ConfigOverlay,
        context: &ResolveContext,
        message: &mut Message,
    ) {
        if let Some(resolved) = self.resolved(overlay, context, keys::ATTACHMENTS) {
            for file in trim_split(&resolved) {
                message.attach_from_path(file);
            }
        }
    }
}

//! SMTP transport implementation

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{
        header::{ContentType, Header, HeaderName, HeaderValue},
        Attachment, Body, MultiPart, SinglePart,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};

use crate::domain::mail::{
    errors::TransportError,
    message::{EmbeddedImage, Message},
    templating::TemplateRenderer,
    transport::MailTransport,
    value_objects::named_address::NamedAddress,
};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long, env = "SMTP_HOST")]
    pub host: String,

    /// The SMTP port
    #[clap(long, env = "SMTP_PORT")]
    pub port: u16,

    /// The SMTP username
    #[clap(long, env = "SMTP_USER")]
    pub username: String,

    /// The SMTP password
    #[clap(long, env = "SMTP_PASSWORD")]
    pub password: String,

    /// Sender address used when a message carries no "from" entry
    #[clap(long, env = "SMTP_SENDER")]
    pub sender: String,

    /// Verify the TLS certificate
    #[clap(long, env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection)
    #[clap(long, env = "SMTP_STARTTLS", default_value = "true")]
    pub starttls: bool,
}

/// SMTP mail transport
///
/// Renders the bound template to HTML at delivery time, builds the MIME
/// message (inline images as a `multipart/related` part, attachments in a
/// `multipart/mixed` envelope, `X-Priority` when set) and relays it through
/// lettre.
#[derive(Clone, Debug)]
pub struct SMTPMailer<TR>
where
    TR: TemplateRenderer,
{
    config: SMTPConfig,
    renderer: TR,
}

impl<TR> SMTPMailer<TR>
where
    TR: TemplateRenderer,
{
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig, renderer: TR) -> Self {
        Self { config, renderer }
    }

    /// Build the underlying relay transport from the configuration
    pub fn mailer(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        let relay = if self.config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
        };

        Ok(relay
            .credentials(creds)
            .port(self.config.port)
            .tls(Tls::Opportunistic(
                TlsParameters::builder(self.config.host.to_string())
                    .dangerous_accept_invalid_certs(!self.config.verify_tls)
                    .build()?,
            ))
            .build())
    }

    fn compose_mime(&self, message: &Message, html: String) -> Result<lettre::Message, TransportError> {
        let mut builder = lettre::Message::builder().subject(message.subject.clone());

        let from = match message.from.first() {
            Some(sender) => lettre_mailbox(sender)?,
            None => self.config.sender.parse()?,
        };
        builder = builder.from(from);

        for to in &message.to {
            builder = builder.to(lettre_mailbox(to)?);
        }
        for cc in &message.cc {
            builder = builder.cc(lettre_mailbox(cc)?);
        }
        if let Some(priority) = message.priority {
            builder = builder.header(XPriority(priority.to_string()));
        }

        let html_part = SinglePart::html(html);
        let mut content = if message.embedded.is_empty() {
            MultiPart::mixed().singlepart(html_part)
        } else {
            let mut related = MultiPart::related().singlepart(html_part);
            for image in &message.embedded {
                related = related.singlepart(embedded_part(image)?);
            }
            MultiPart::mixed().multipart(related)
        };
        for path in &message.attachments {
            content = content.singlepart(attachment_part(path)?);
        }

        Ok(builder.multipart(content)?)
    }
}

#[async_trait]
impl<TR> MailTransport for SMTPMailer<TR>
where
    TR: TemplateRenderer,
{
    async fn deliver(&self, message: &Message) -> Result<(), TransportError> {
        let html = self.renderer.render(&message.template, &message.variables)?;
        let email = self.compose_mime(message, html)?;

        match self.mailer()?.send(email).await {
            Ok(_) => Ok(()),
            Err(e) => Err(TransportError::UnknownError(e.into())),
        }
    }
}

fn lettre_mailbox(address: &NamedAddress) -> Result<lettre::message::Mailbox, TransportError> {
    Ok(address.to_string().parse()?)
}

fn embedded_part(image: &EmbeddedImage) -> Result<SinglePart, TransportError> {
    let data = std::fs::read(&image.path).map_err(|e| TransportError::UnknownError(e.into()))?;
    Ok(Attachment::new_inline(image.content_id.clone())
        .body(Body::new(data), content_type_for(&image.path)))
}

fn attachment_part(path: &Path) -> Result<SinglePart, TransportError> {
    let data = std::fs::read(path).map_err(|e| TransportError::UnknownError(e.into()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Attachment::new(filename).body(Body::new(data), content_type_for(path)))
}

fn content_type_for(path: &Path) -> ContentType {
    let mime = match path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    };
    ContentType::parse(mime).unwrap_or(ContentType::TEXT_PLAIN)
}

#[derive(Clone)]
struct XPriority(String);

impl Header for XPriority {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Priority")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::mail::templating::MockTemplateRenderer;

    use super::*;

    fn mailer() -> SMTPMailer<MockTemplateRenderer> {
        let config = SMTPConfig {
            sender: "fallback@example.com".to_string(),
            ..Default::default()
        };
        SMTPMailer::new(config, MockTemplateRenderer::new())
    }

    fn message() -> Message {
        let mut message = Message::new();
        message
            .to(NamedAddress::new("user@example.com", "User").unwrap())
            .from(NamedAddress::new("noreply@example.com", "Site").unwrap())
            .subject("Welcome");
        message
    }

    #[test]
    fn test_compose_mime_carries_addresses_and_subject() -> TestResult {
        let email = mailer().compose_mime(&message(), "<p>Hello</p>".to_string())?;

        let formatted = String::from_utf8_lossy(&email.formatted()).to_string();
        assert!(formatted.contains("Subject: Welcome"));
        assert!(formatted.contains("user@example.com"));
        assert!(formatted.contains("noreply@example.com"));
        assert!(formatted.contains("<p>Hello</p>"));

        Ok(())
    }

    #[test]
    fn test_compose_mime_sets_priority_header() -> TestResult {
        let mut message = message();
        message.priority(2);

        let email = mailer().compose_mime(&message, String::new())?;

        let formatted = String::from_utf8_lossy(&email.formatted()).to_string();
        assert!(formatted.contains("X-Priority: 2"));

        Ok(())
    }

    #[test]
    fn test_compose_mime_falls_back_to_configured_sender() -> TestResult {
        let mut message = Message::new();
        message
            .to(NamedAddress::new("user@example.com", "User").unwrap())
            .subject("Welcome");

        let email = mailer().compose_mime(&message, String::new())?;

        let formatted = String::from_utf8_lossy(&email.formatted()).to_string();
        assert!(formatted.contains("fallback@example.com"));

        Ok(())
    }
}

#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Templated email composition with declarative send-time overrides.
//!
//! A [`MessageComposer`](domain::mail::composer::MessageComposer) builds a
//! template-bound [`Message`](domain::mail::message::Message) from recipient
//! and sender lists, applies a chain of optional overrides supplied by a
//! [`ConfigOverlay`](domain::mail::overlay::ConfigOverlay), and hands the
//! result to a [`MailTransport`](domain::mail::transport::MailTransport).
//! Subscribers registered on the composer are notified immediately before
//! and after the transport call; before-send subscribers may still mutate
//! the message.
//!
//! ```ignore
//! let config = SMTPConfig::parse();
//! let renderer = MiniJinjaRenderer::new("templates");
//! let mut composer = MessageComposer::new(
//!     Arc::new(ContextResolver),
//!     Arc::new(SMTPMailer::new(config, renderer)),
//! );
//! composer.subscribe(Arc::new(LoggingSubscriber));
//!
//! let overlay = ConfigOverlay::new().with(keys::ENABLE, "1");
//! let sent = composer
//!     .send(
//!         "welcome",
//!         &[NamedAddress::new("user@example.com", "User")?],
//!         &[NamedAddress::new("noreply@example.com", "Example")?],
//!         "Welcome!",
//!         &mut VariableBag::new(),
//!         &overlay,
//!     )
//!     .await?;
//! ```

pub mod domain;
pub mod infrastructure;

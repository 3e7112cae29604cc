//! Composed mail message

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::value_objects::named_address::NamedAddress;
use super::variables::VariableBag;

/// Body format of a composed message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyFormat {
    /// HTML body rendered from the bound template.
    #[default]
    Html,
    /// Plain text body.
    Plain,
}

/// An image embedded into the message body, addressable from the template
/// through its content id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedImage {
    /// Content id the transport attaches the image under.
    pub content_id: String,

    /// Source file path.
    pub path: PathBuf,
}

/// The in-memory composed email prior to transport.
///
/// Assembled per `send` invocation and discarded after the after-send
/// notification fires; only before-send subscribers may still mutate it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Message {
    /// Primary recipients.
    pub to: Vec<NamedAddress>,

    /// Sender addresses; transports honor only the first.
    pub from: Vec<NamedAddress>,

    /// Carbon-copy recipients.
    pub cc: Vec<NamedAddress>,

    /// Subject line.
    pub subject: String,

    /// Identifier of the template bound for rendering.
    pub template: String,

    /// Body format.
    pub format: BodyFormat,

    /// Pre-rendered body, empty until the templating collaborator renders.
    pub html_body: String,

    /// Variables for the templating collaborator.
    pub variables: VariableBag,

    /// Numeric priority; unset unless overridden.
    pub priority: Option<i32>,

    /// Attached file paths.
    pub attachments: Vec<PathBuf>,

    /// Embedded images keyed by content id.
    pub embedded: Vec<EmbeddedImage>,
}

impl Message {
    /// Create an empty message
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primary recipient
    pub fn to(&mut self, address: NamedAddress) -> &mut Self {
        self.to.push(address);
        self
    }

    /// Add a sender address
    pub fn from(&mut self, address: NamedAddress) -> &mut Self {
        self.from.push(address);
        self
    }

    /// Add a carbon-copy recipient
    pub fn cc(&mut self, address: NamedAddress) -> &mut Self {
        self.cc.push(address);
        self
    }

    /// Set the subject line
    pub fn subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = subject.into();
        self
    }

    /// Bind the template to render the body from
    pub fn set_template(&mut self, template: impl Into<String>) -> &mut Self {
        self.template = template.into();
        self
    }

    /// Set the body format
    pub fn format(&mut self, format: BodyFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Set the pre-rendered body
    pub fn html(&mut self, body: impl Into<String>) -> &mut Self {
        self.html_body = body.into();
        self
    }

    /// Replace the variables handed to the templating collaborator
    pub fn assign_variables(&mut self, variables: VariableBag) -> &mut Self {
        self.variables = variables;
        self
    }

    /// Set the numeric priority
    pub fn priority(&mut self, priority: i32) -> &mut Self {
        self.priority = Some(priority);
        self
    }

    /// Attach a file by path
    pub fn attach_from_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.attachments.push(path.into());
        self
    }

    /// Embed an image by path and return the handle templates reference it
    /// by (a `cid:` URL usable in an `src` attribute).
    pub fn embed_from_path(&mut self, path: impl Into<PathBuf>) -> String {
        let content_id = format!("image-{}", self.embedded.len() + 1);
        self.embedded.push(EmbeddedImage {
            content_id: content_id.clone(),
            path: path.into(),
        });
        format!("cid:{content_id}")
    }
}

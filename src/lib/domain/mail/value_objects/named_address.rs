//! Address and display-name pair

use std::fmt;

use serde::{Deserialize, Serialize};

use super::email_address::{EmailAddress, EmailAddressError};

/// An email address paired with a display name.
///
/// Recipient and sender lists are ordered collections of these pairs; a
/// carbon-copy entry added from an overlay carries an empty display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAddress {
    email: EmailAddress,
    name: String,
}

impl NamedAddress {
    /// Create an address with a display name
    pub fn new(email: &str, name: &str) -> Result<Self, EmailAddressError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            name: name.trim().to_string(),
        })
    }

    /// Create an address without a display name
    pub fn bare(email: &str) -> Result<Self, EmailAddressError> {
        Self::new(email, "")
    }

    /// The address part
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The display name; empty for bare addresses
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NamedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.email)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}

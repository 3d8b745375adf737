//! User model
//!
//! Users own budget periods and goals. A user is identified by email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized email address (trimmed, lower-cased)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Normalize an email without validating it
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Minimal shape check; full address validation is the identity provider's job
    pub fn looks_valid(&self) -> bool {
        match self.0.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
            None => false,
        }
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Email {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: Email, name: impl Into<String>) -> Self {
        Self {
            email,
            name: name.into().trim().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Validate the user, returning every problem found
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Full name is required".to_string());
        } else if self.name.len() > 255 {
            errors.push("Full name must be at most 255 characters".to_string());
        }

        if self.email.is_empty() {
            errors.push("Email is required".to_string());
        } else if !self.email.looks_valid() {
            errors.push("Please enter a valid email address".to_string());
        }

        errors
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

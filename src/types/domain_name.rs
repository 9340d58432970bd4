// ABOUTME: DNS hostname validation for the ingress domain.
// ABOUTME: Each dot-separated label must follow RFC 1035 letter/digit/hyphen rules.

use std::fmt;
use thiserror::Error;

/// Maximum length of a single DNS label.
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainNameError {
    #[error("domain name cannot be empty")]
    Empty,

    #[error("domain name contains an empty label")]
    EmptyLabel,

    #[error("label '{0}' exceeds maximum length of 63 characters")]
    LabelTooLong(String),

    #[error("label '{0}' cannot start with a hyphen")]
    StartsWithHyphen(String),

    #[error("label '{0}' cannot end with a hyphen")]
    EndsWithHyphen(String),

    #[error("invalid character in domain name: '{0}'")]
    InvalidChar(char),
}

/// A validated domain name such as `demo.example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(String);

impl DomainName {
    pub fn new(value: &str) -> Result<Self, DomainNameError> {
        if value.is_empty() {
            return Err(DomainNameError::Empty);
        }

        for label in value.split('.') {
            validate_label(label)?;
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The domain with its first label removed, if it has more than one.
    ///
    /// `demo.example.com` has parent `example.com`; `localhost` has none.
    pub fn parent(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, rest)| rest)
    }

    /// The wildcard certificate name that would cover this domain.
    pub fn wildcard(&self) -> Option<String> {
        self.parent().map(|parent| format!("*.{parent}"))
    }
}

fn validate_label(label: &str) -> Result<(), DomainNameError> {
    if label.is_empty() {
        return Err(DomainNameError::EmptyLabel);
    }

    if label.len() > MAX_LABEL_LEN {
        return Err(DomainNameError::LabelTooLong(label.to_string()));
    }

    if let Some(c) = label
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
    {
        return Err(DomainNameError::InvalidChar(c));
    }

    if label.starts_with('-') {
        return Err(DomainNameError::StartsWithHyphen(label.to_string()));
    }

    if label.ends_with('-') {
        return Err(DomainNameError::EndsWithHyphen(label.to_string()));
    }

    Ok(())
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DomainName {
    type Err = DomainNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

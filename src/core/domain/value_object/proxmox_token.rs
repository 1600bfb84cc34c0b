use crate::core::domain::error::{ProxmoxResult, ValidationError};
use std::fmt;

/// The identifier part of an API token (`user@realm!<token_id>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxTokenId(String);

impl ProxmoxTokenId {
    /// Validates and wraps a token identifier.
    pub fn new(token_id: impl Into<String>) -> ProxmoxResult<Self> {
        let token_id = token_id.into();
        validate_token_id(&token_id)?;
        Ok(Self(token_id))
    }

    /// Creates a new token id without validation.
    pub(crate) fn new_unchecked(token_id: String) -> Self {
        Self(token_id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The secret (UUID) half of an API token.
///
/// `Debug` is redacted so the secret never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxmoxTokenSecret(String);

impl ProxmoxTokenSecret {
    /// Validates and wraps a token secret.
    pub fn new(secret: impl Into<String>) -> ProxmoxResult<Self> {
        let secret = secret.into();
        validate_token_secret(&secret)?;
        Ok(Self(secret))
    }

    /// Creates a new token secret without validation.
    pub(crate) fn new_unchecked(secret: String) -> Self {
        Self(secret)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProxmoxTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProxmoxTokenSecret(***)")
    }
}

/// Validates a token id: a letter followed by letters, digits, `.`, `-` or `_`.
pub(crate) fn validate_token_id(token_id: &str) -> Result<(), ValidationError> {
    let mut chars = token_id.chars();
    match chars.next() {
        None => Err(ValidationError::field("token_id", "Token id cannot be empty")),
        Some(first) if !first.is_ascii_alphabetic() => Err(ValidationError::Format(
            "Token id must start with a letter".to_string(),
        )),
        Some(_) => {
            if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')) {
                Ok(())
            } else {
                Err(ValidationError::Format(
                    "Token id contains invalid characters".to_string(),
                ))
            }
        }
    }
}

/// Validates a token secret (Proxmox issues UUIDs).
pub(crate) fn validate_token_secret(secret: &str) -> Result<(), ValidationError> {
    if secret.is_empty() {
        return Err(ValidationError::field(
            "token_secret",
            "Token secret cannot be empty",
        ));
    }
    let groups: Vec<&str> = secret.split('-').collect();
    let lengths: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    if lengths != [8, 4, 4, 4, 12] || !groups.iter().all(|g| g.chars().all(|c| c.is_ascii_hexdigit())) {
        return Err(ValidationError::Format(
            "Token secret must be a UUID (xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx)".to_string(),
        ));
    }
    Ok(())
}

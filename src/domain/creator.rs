use crate::error::TipError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_HANDLE_LEN: usize = 64;

/// Normalised, validated creator handle.
///
/// Handles are case-insensitive and may be written with a leading `@`;
/// `"@Alice "` and `"alice"` name the same creator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CreatorHandle(String);

impl CreatorHandle {
    pub fn parse(raw: &str) -> Result<Self, TipError> {
        let handle = raw.trim().trim_start_matches('@').to_ascii_lowercase();

        if handle.is_empty() {
            return Err(TipError::Validation(
                "Creator handle is required".to_string(),
            ));
        }
        if handle.len() > MAX_HANDLE_LEN {
            return Err(TipError::Validation(format!(
                "Creator handle must be at most {MAX_HANDLE_LEN} characters"
            )));
        }
        if !handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(TipError::Validation(format!(
                "Invalid creator handle: {handle}"
            )));
        }

        Ok(Self(handle))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CreatorHandle {
    type Error = TipError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CreatorHandle> for String {
    fn from(handle: CreatorHandle) -> Self {
        handle.0
    }
}

impl fmt::Display for CreatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A creator as known to the directory. Read-only to the settlement pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub handle: CreatorHandle,
    pub display_name: String,
    /// Where tip notifications are delivered.
    pub email: Option<String>,
    /// Payout address handed to the payment provider.
    pub wallet_address: Option<String>,
}

impl Creator {
    pub fn new(handle: CreatorHandle, display_name: impl Into<String>) -> Self {
        Self {
            handle,
            display_name: display_name.into(),
            email: None,
            wallet_address: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_wallet(mut self, address: impl Into<String>) -> Self {
        self.wallet_address = Some(address.into());
        self
    }
}

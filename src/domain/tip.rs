use super::amount::Amount;
use super::creator::CreatorHandle;
use super::payment::PaymentHandle;
use crate::error::{Result, TipError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const MAX_MESSAGE_LEN: usize = 500;
const MAX_TIPPER_NAME_LEN: usize = 100;

/// Identifier of a recorded tip, e.g. `tip-01920c5e7a3b7c2d9f3e4a5b6c7d8e9f`.
///
/// Backed by a UUIDv7 so identifiers sort by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TipId(String);

impl TipId {
    pub fn generate() -> Self {
        Self(format!("tip-{}", Uuid::now_v7().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TipId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional identity the tipper chose to share.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TipperInfo {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl TipperInfo {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Someone")
    }
}

/// Inbound intent to tip a creator, exactly as the client sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipRequest {
    pub creator_handle: String,
    pub amount: Decimal,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tipper_name: Option<String>,
    #[serde(default)]
    pub tipper_email: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
}

/// A `TipRequest` that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTipRequest {
    pub creator_handle: CreatorHandle,
    pub amount: Amount,
    pub message: Option<String>,
    pub tipper: TipperInfo,
    pub payment_id: Option<PaymentHandle>,
}

impl TipRequest {
    pub fn validate(self) -> Result<ValidTipRequest> {
        let creator_handle = CreatorHandle::parse(&self.creator_handle)?;
        let amount = Amount::new(self.amount)?;

        let message = non_blank(self.message);
        if let Some(message) = &message
            && message.chars().count() > MAX_MESSAGE_LEN
        {
            return Err(TipError::Validation(format!(
                "Message must be at most {MAX_MESSAGE_LEN} characters"
            )));
        }

        let name = non_blank(self.tipper_name);
        if let Some(name) = &name
            && name.chars().count() > MAX_TIPPER_NAME_LEN
        {
            return Err(TipError::Validation(format!(
                "Tipper name must be at most {MAX_TIPPER_NAME_LEN} characters"
            )));
        }

        let email = non_blank(self.tipper_email);
        if let Some(email) = &email {
            validate_email(email)?;
        }

        Ok(ValidTipRequest {
            creator_handle,
            amount,
            message,
            tipper: TipperInfo { name, email },
            payment_id: non_blank(self.payment_id).map(PaymentHandle::from),
        })
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn validate_email(email: &str) -> Result<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(TipError::Validation(format!("Invalid email: {email}"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipStatus {
    /// Recorded with no payment reference; reconciliation happens elsewhere.
    Recorded,
    /// Recorded against a provider payment that had not settled yet.
    AwaitingPayment,
}

/// The durable settlement record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub id: TipId,
    pub creator_handle: CreatorHandle,
    pub amount: Amount,
    pub currency: String,
    pub message: Option<String>,
    pub tipper: TipperInfo,
    pub payment_id: Option<PaymentHandle>,
    pub status: TipStatus,
    pub created_at: DateTime<Utc>,
}

impl Tip {
    /// Builds a fresh record with a new identifier and the current time.
    pub fn record(request: ValidTipRequest, currency: impl Into<String>) -> Self {
        let status = if request.payment_id.is_some() {
            TipStatus::AwaitingPayment
        } else {
            TipStatus::Recorded
        };

        Self {
            id: TipId::generate(),
            creator_handle: request.creator_handle,
            amount: request.amount,
            currency: currency.into(),
            message: request.message,
            tipper: request.tipper,
            payment_id: request.payment_id,
            status,
            created_at: Utc::now(),
        }
    }
}

/// What the caller gets back once a tip is durable.
#[derive(Debug, Clone, PartialEq)]
pub struct TipConfirmation {
    pub tip_id: TipId,
    pub message: String,
}

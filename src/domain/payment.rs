use super::amount::Amount;
use super::creator::CreatorHandle;
use super::tip::{TipperInfo, non_blank, validate_email};
use crate::error::{Result, TipError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque payment identifier minted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentHandle(String);

impl PaymentHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PaymentHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PaymentHandle {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PaymentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a payment attempt.
///
/// `Initiated -> Pending -> {Complete | Failed}`, plus `Initiated -> Failed`
/// when the provider rejects the payment outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Initiated,
    Pending,
    Complete,
    Failed,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Complete | PaymentStatus::Failed)
    }

    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (Initiated, Pending) | (Initiated, Failed) | (Pending, Complete) | (Pending, Failed)
        )
    }

    /// Applies `next`, treating a repeat of the current status as a no-op.
    pub fn transition(self, next: PaymentStatus) -> Result<PaymentStatus> {
        if self == next || self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TipError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Initiated => "initiated",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Complete => "complete",
            PaymentStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Inbound request to start a wallet payment towards a creator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub creator_handle: String,
    pub amount: Decimal,
    #[serde(default)]
    pub tipper_name: Option<String>,
    #[serde(default)]
    pub tipper_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidPaymentIntent {
    pub creator_handle: CreatorHandle,
    pub amount: Amount,
    pub payer: TipperInfo,
}

impl PaymentIntent {
    pub fn validate(self) -> Result<ValidPaymentIntent> {
        let creator_handle = CreatorHandle::parse(&self.creator_handle)?;
        let amount = Amount::new(self.amount)?;
        let email = non_blank(self.tipper_email);
        if let Some(email) = &email {
            validate_email(email)?;
        }

        Ok(ValidPaymentIntent {
            creator_handle,
            amount,
            payer: TipperInfo {
                name: non_blank(self.tipper_name),
                email,
            },
        })
    }
}

/// What the adapter hands to the external provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Amount,
    pub currency: String,
    pub recipient_address: String,
    pub payer_name: Option<String>,
    pub payer_email: Option<String>,
    pub callback_url: String,
}

/// Provider answer to an initiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub payment_id: PaymentHandle,
    pub status: PaymentStatus,
}

/// Locally tracked view of a payment attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentAttempt {
    pub handle: PaymentHandle,
    pub creator_handle: CreatorHandle,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub updated_at: DateTime<Utc>,
}

/// Result of applying a reported status to a stored attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub previous: PaymentStatus,
    pub current: PaymentStatus,
}

impl StatusChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

impl PaymentAttempt {
    /// Moves the attempt to `next`, bumping `updated_at` only on a real change.
    pub fn apply(&mut self, next: PaymentStatus) -> Result<StatusChange> {
        let previous = self.status;
        let current = previous.transition(next)?;
        if current != previous {
            self.status = current;
            self.updated_at = Utc::now();
        }
        Ok(StatusChange { previous, current })
    }
}

/// Asynchronous completion signal posted by the provider to the callback URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallback {
    pub payment_id: PaymentHandle,
    pub status: PaymentStatus,
}

use crate::config::PaymentConfig;
use crate::domain::payment::{
    PaymentAttempt, PaymentCallback, PaymentHandle, PaymentIntent, PaymentRequest, PaymentStatus,
    StatusChange,
};
use crate::domain::ports::{CreatorDirectoryBox, PaymentAttemptStoreBox, PaymentProviderBox};
use crate::error::{Result, TipError};
use chrono::Utc;
use tracing::{error, info, warn};

/// Drives wallet payments through the provider and tracks their state.
///
/// Independent of `TipSettlement`: a tip may be recorded
/// before, after or without the matching payment reaching a terminal state.
pub struct PaymentService {
    directory: CreatorDirectoryBox,
    provider: PaymentProviderBox,
    attempts: PaymentAttemptStoreBox,
    config: PaymentConfig,
}

impl PaymentService {
    pub fn new(
        directory: CreatorDirectoryBox,
        provider: PaymentProviderBox,
        attempts: PaymentAttemptStoreBox,
        config: PaymentConfig,
    ) -> Self {
        Self {
            directory,
            provider,
            attempts,
            config,
        }
    }

    /// Starts a payment to the creator's payout address.
    pub async fn initiate(&self, intent: PaymentIntent) -> Result<PaymentAttempt> {
        let intent = intent.validate()?;

        let creator = self
            .directory
            .find_by_handle(&intent.creator_handle)
            .await?
            .ok_or_else(|| TipError::CreatorNotFound(intent.creator_handle.to_string()))?;

        let recipient_address = creator.wallet_address.clone().ok_or_else(|| {
            TipError::Validation(format!("Creator {} has no payout address", creator.handle))
        })?;

        let request = PaymentRequest {
            amount: intent.amount,
            currency: self.config.currency.clone(),
            recipient_address,
            payer_name: intent.payer.name,
            payer_email: intent.payer.email,
            callback_url: self.config.callback_url.clone(),
        };

        let receipt = self
            .provider
            .initiate_payment(&request)
            .await
            .map_err(|e| {
                warn!(creator = %creator.handle, error = %e, "payment initiation failed");
                as_provider_error(e)
            })?;

        let status = PaymentStatus::Initiated
            .transition(receipt.status)
            .map_err(|_| {
                TipError::PaymentProvider(format!(
                    "provider reported {} for a new payment",
                    receipt.status
                ))
            })?;

        let attempt = PaymentAttempt {
            handle: receipt.payment_id,
            creator_handle: creator.handle,
            amount: intent.amount,
            status,
            updated_at: Utc::now(),
        };
        self.attempts.store(attempt.clone()).await.inspect_err(|e| {
            error!(
                payment_id = %attempt.handle,
                creator = %attempt.creator_handle,
                error = %e,
                "failed to record accepted payment"
            );
        })?;

        info!(
            payment_id = %attempt.handle,
            creator = %attempt.creator_handle,
            status = %attempt.status,
            "payment initiated"
        );
        Ok(attempt)
    }

    /// Current status, refreshed from the provider unless already terminal.
    ///
    /// A provider report the stored attempt cannot move to is a provider
    /// error, unless a concurrent update already made the attempt terminal.
    pub async fn status(&self, handle: &PaymentHandle) -> Result<PaymentStatus> {
        let attempt = self
            .attempts
            .get(handle)
            .await?
            .ok_or_else(|| TipError::PaymentNotFound(handle.to_string()))?;
        if attempt.status.is_terminal() {
            return Ok(attempt.status);
        }

        let reported = self
            .provider
            .get_payment_status(handle)
            .await
            .map_err(as_provider_error)?;

        match self.advance(handle, reported).await {
            Err(TipError::InvalidTransition { from, .. }) if from.is_terminal() => Ok(from),
            Err(TipError::InvalidTransition { from, to }) => Err(TipError::PaymentProvider(
                format!("provider reported {to} for a payment that is {from}"),
            )),
            other => other,
        }
    }

    /// Applies a completion signal posted by the provider.
    ///
    /// A repeat of the current status is accepted, so providers that retry
    /// their callbacks are harmless.
    pub async fn apply_callback(&self, callback: PaymentCallback) -> Result<PaymentStatus> {
        self.advance(&callback.payment_id, callback.status).await
    }

    async fn advance(&self, handle: &PaymentHandle, next: PaymentStatus) -> Result<PaymentStatus> {
        let StatusChange { previous, current } = self
            .attempts
            .update_status(handle, next)
            .await
            .inspect_err(|e| {
                warn!(payment_id = %handle, error = %e, "rejected payment status update");
            })?;

        if previous != current {
            info!(
                payment_id = %handle,
                from = %previous,
                to = %current,
                "payment status changed"
            );
        }
        Ok(current)
    }
}

fn as_provider_error(err: TipError) -> TipError {
    match err {
        TipError::PaymentProvider(_) => err,
        other => TipError::PaymentProvider(other.to_string()),
    }
}

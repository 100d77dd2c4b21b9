use crate::config::SettlementConfig;
use crate::domain::creator::Creator;
use crate::domain::notification::TipReceivedTemplate;
use crate::domain::ports::{CreatorDirectoryBox, NotifierBox, TipLedgerBox};
use crate::domain::tip::{Tip, TipConfirmation, TipRequest, TipperInfo};
use crate::error::{Result, TipError};
use tracing::{error, info, warn};

/// Settles tips: validate, resolve the creator, persist, then notify.
///
/// Persisting the tip is the durability boundary. Once the ledger accepts the
/// record the call succeeds, whatever happens to the notification afterwards.
/// A ledger failure fails the call and no notification is attempted.
pub struct TipSettlement {
    directory: CreatorDirectoryBox,
    ledger: TipLedgerBox,
    notifier: NotifierBox,
    config: SettlementConfig,
}

impl TipSettlement {
    /// Creates a new `TipSettlement` instance.
    ///
    /// # Arguments
    ///
    /// * `directory` - Creator lookup.
    /// * `ledger` - Durable tip store.
    /// * `notifier` - Best-effort delivery of the "tip received" message.
    /// * `config` - Currency, success message and notification timeout.
    pub fn new(
        directory: CreatorDirectoryBox,
        ledger: TipLedgerBox,
        notifier: NotifierBox,
        config: SettlementConfig,
    ) -> Self {
        Self {
            directory,
            ledger,
            notifier,
            config,
        }
    }

    /// Settles a single tip.
    ///
    /// Fails with `Validation`, `CreatorNotFound` or `Persistence`. Notification
    /// problems are logged and never change the result.
    pub async fn settle_tip(&self, request: TipRequest) -> Result<TipConfirmation> {
        let request = request.validate()?;

        let creator = self
            .directory
            .find_by_handle(&request.creator_handle)
            .await?
            .ok_or_else(|| TipError::CreatorNotFound(request.creator_handle.to_string()))?;

        let tipper = request.tipper.clone();
        let tip = Tip::record(request, self.config.currency.as_str());

        let tip = self.ledger.create_tip(tip).await.map_err(|e| {
            error!(creator = %creator.handle, error = %e, "failed to persist tip");
            match e {
                TipError::Persistence(_) => e,
                other => TipError::Persistence(other.to_string()),
            }
        })?;

        info!(
            tip_id = %tip.id,
            creator = %tip.creator_handle,
            amount = %tip.amount,
            currency = %tip.currency,
            "tip settled"
        );

        if let Err(e) = self.notify_creator(&tip, &creator, &tipper).await {
            warn!(
                tip_id = %tip.id,
                creator = %creator.handle,
                error = %e,
                "creator notification failed, tip stays settled"
            );
        }

        Ok(TipConfirmation {
            tip_id: tip.id,
            message: self.config.success_message.clone(),
        })
    }

    async fn notify_creator(&self, tip: &Tip, creator: &Creator, tipper: &TipperInfo) -> Result<()> {
        let notification = TipReceivedTemplate::render(tip, creator, tipper)?;

        tokio::time::timeout(self.config.notify_timeout, self.notifier.notify(&notification))
            .await
            .map_err(|_| TipError::Notification("notifier timed out".to_string()))?
    }
}

use super::creator::{Creator, CreatorHandle};
use super::notification::Notification;
use super::payment::{
    PaymentAttempt, PaymentHandle, PaymentReceipt, PaymentRequest, PaymentStatus, StatusChange,
};
use super::tip::{Tip, TipId};
use crate::error::Result;
use async_trait::async_trait;

/// Read-only creator lookup. Must be safe to call concurrently.
#[async_trait]
pub trait CreatorDirectory: Send + Sync {
    async fn find_by_handle(&self, handle: &CreatorHandle) -> Result<Option<Creator>>;
}

/// Append-only store of tips. Owns identifier uniqueness.
#[async_trait]
pub trait TipLedger: Send + Sync {
    /// Persists a new tip, failing with `Persistence` if the id already exists.
    async fn create_tip(&self, tip: Tip) -> Result<Tip>;
    async fn get(&self, id: &TipId) -> Result<Option<Tip>>;
}

/// Best-effort delivery of a rendered message.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// External wallet/payment capability. Implementations never retry.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn initiate_payment(&self, request: &PaymentRequest) -> Result<PaymentReceipt>;
    async fn get_payment_status(&self, handle: &PaymentHandle) -> Result<PaymentStatus>;
}

/// Local record of payment attempts driven through the provider.
#[async_trait]
pub trait PaymentAttemptStore: Send + Sync {
    async fn store(&self, attempt: PaymentAttempt) -> Result<()>;
    async fn get(&self, handle: &PaymentHandle) -> Result<Option<PaymentAttempt>>;

    /// Applies `next` to the stored attempt as one atomic step.
    ///
    /// Fails with `PaymentNotFound` for an unknown handle and with
    /// `InvalidTransition` when the stored status cannot move to `next`.
    async fn update_status(&self, handle: &PaymentHandle, next: PaymentStatus)
    -> Result<StatusChange>;
}

pub type CreatorDirectoryBox = Box<dyn CreatorDirectory>;
pub type TipLedgerBox = Box<dyn TipLedger>;
pub type NotifierBox = Box<dyn Notifier>;
pub type PaymentProviderBox = Box<dyn PaymentProvider>;
pub type PaymentAttemptStoreBox = Box<dyn PaymentAttemptStore>;

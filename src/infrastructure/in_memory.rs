use crate::domain::creator::{Creator, CreatorHandle};
use crate::domain::payment::{PaymentAttempt, PaymentHandle, PaymentStatus, StatusChange};
use crate::domain::ports::{CreatorDirectory, PaymentAttemptStore, TipLedger};
use crate::domain::tip::{Tip, TipId};
use crate::error::{Result, TipError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory creator directory.
///
/// Uses `Arc<RwLock<HashMap<CreatorHandle, Creator>>>`; lookups only take the
/// read lock, so concurrent settlements never contend with each other.
#[derive(Default, Clone)]
pub struct InMemoryCreatorDirectory {
    creators: Arc<RwLock<HashMap<CreatorHandle, Creator>>>,
}

impl InMemoryCreatorDirectory {
    /// Creates a new, empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from an iterator of creators. Later duplicates win.
    pub fn from_creators(creators: impl IntoIterator<Item = Creator>) -> Self {
        let map = creators
            .into_iter()
            .map(|c| (c.handle.clone(), c))
            .collect();
        Self {
            creators: Arc::new(RwLock::new(map)),
        }
    }

    /// Adds or replaces a creator. Returns the previous entry, if any.
    pub async fn insert(&self, creator: Creator) -> Option<Creator> {
        let mut creators = self.creators.write().await;
        creators.insert(creator.handle.clone(), creator)
    }

    pub async fn len(&self) -> usize {
        self.creators.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.creators.read().await.is_empty()
    }
}

#[async_trait]
impl CreatorDirectory for InMemoryCreatorDirectory {
    async fn find_by_handle(&self, handle: &CreatorHandle) -> Result<Option<Creator>> {
        let creators = self.creators.read().await;
        Ok(creators.get(handle).cloned())
    }
}

/// A thread-safe in-memory tip ledger.
///
/// The id check and the insert happen under one write lock, so two
/// concurrent inserts with the same id cannot both succeed.
#[derive(Default, Clone)]
pub struct InMemoryTipLedger {
    tips: Arc<RwLock<HashMap<TipId, Tip>>>,
}

impl InMemoryTipLedger {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tips.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tips.read().await.is_empty()
    }

    /// All recorded tips, oldest first.
    pub async fn all(&self) -> Vec<Tip> {
        let tips = self.tips.read().await;
        let mut all: Vec<Tip> = tips.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

#[async_trait]
impl TipLedger for InMemoryTipLedger {
    async fn create_tip(&self, tip: Tip) -> Result<Tip> {
        let mut tips = self.tips.write().await;
        match tips.entry(tip.id.clone()) {
            Entry::Occupied(_) => Err(TipError::Persistence(format!(
                "Tip {} already exists",
                tip.id
            ))),
            Entry::Vacant(slot) => Ok(slot.insert(tip).clone()),
        }
    }

    async fn get(&self, id: &TipId) -> Result<Option<Tip>> {
        let tips = self.tips.read().await;
        Ok(tips.get(id).cloned())
    }
}

/// A thread-safe in-memory registry of payment attempts.
///
/// Status updates read and write the attempt under one write lock, so racing
/// updates are applied one after the other.
#[derive(Default, Clone)]
pub struct InMemoryPaymentAttemptStore {
    attempts: Arc<RwLock<HashMap<PaymentHandle, PaymentAttempt>>>,
}

impl InMemoryPaymentAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentAttemptStore for InMemoryPaymentAttemptStore {
    async fn store(&self, attempt: PaymentAttempt) -> Result<()> {
        let mut attempts = self.attempts.write().await;
        attempts.insert(attempt.handle.clone(), attempt);
        Ok(())
    }

    async fn get(&self, handle: &PaymentHandle) -> Result<Option<PaymentAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.get(handle).cloned())
    }

    async fn update_status(
        &self,
        handle: &PaymentHandle,
        next: PaymentStatus,
    ) -> Result<StatusChange> {
        let mut attempts = self.attempts.write().await;
        attempts
            .get_mut(handle)
            .ok_or_else(|| TipError::PaymentNotFound(handle.to_string()))?
            .apply(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::Amount;
    use crate::domain::tip::TipRequest;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn handle(s: &str) -> CreatorHandle {
        CreatorHandle::parse(s).unwrap()
    }

    fn tip() -> Tip {
        let request = TipRequest {
            creator_handle: "alice".to_string(),
            amount: dec!(1.0),
            ..Default::default()
        };
        Tip::record(request.validate().unwrap(), "USDC")
    }

    #[tokio::test]
    async fn test_in_memory_creator_directory() {
        let directory = InMemoryCreatorDirectory::from_creators([Creator::new(
            handle("alice"),
            "Alice",
        )]);

        let found = directory.find_by_handle(&handle("alice")).await.unwrap();
        assert_eq!(found.unwrap().display_name, "Alice");
        assert!(
            directory
                .find_by_handle(&handle("ghost"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_directory_insert_replaces() {
        let directory = InMemoryCreatorDirectory::new();
        assert!(directory.insert(Creator::new(handle("a"), "A")).await.is_none());
        let previous = directory.insert(Creator::new(handle("a"), "A2")).await;
        assert_eq!(previous.unwrap().display_name, "A");
        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn test_in_memory_tip_ledger() {
        let ledger = InMemoryTipLedger::new();
        let tip = tip();

        let stored = ledger.create_tip(tip.clone()).await.unwrap();
        assert_eq!(stored, tip);

        let retrieved = ledger.get(&tip.id).await.unwrap().unwrap();
        assert_eq!(retrieved, tip);
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_ledger_rejects_duplicate_id() {
        let ledger = InMemoryTipLedger::new();
        let tip = tip();

        ledger.create_tip(tip.clone()).await.unwrap();
        let result = ledger.create_tip(tip).await;

        assert!(matches!(result, Err(TipError::Persistence(_))));
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_in_memory_payment_attempt_store() {
        let store = InMemoryPaymentAttemptStore::new();
        let attempt = PaymentAttempt {
            handle: PaymentHandle::from("pay-1"),
            creator_handle: handle("alice"),
            amount: Amount::new(dec!(2)).unwrap(),
            status: PaymentStatus::Pending,
            updated_at: Utc::now(),
        };

        store.store(attempt.clone()).await.unwrap();
        let retrieved = store.get(&attempt.handle).await.unwrap().unwrap();
        assert_eq!(retrieved, attempt);
        assert!(store.get(&PaymentHandle::from("pay-2")).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_terminal_updates_apply_once() {
        let store = InMemoryPaymentAttemptStore::new();
        let handle = PaymentHandle::from("pay-race");
        store
            .store(PaymentAttempt {
                handle: handle.clone(),
                creator_handle: CreatorHandle::parse("alice").unwrap(),
                amount: Amount::new(dec!(2)).unwrap(),
                status: PaymentStatus::Pending,
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            let handle = handle.clone();
            let next = if i % 2 == 0 {
                PaymentStatus::Complete
            } else {
                PaymentStatus::Failed
            };
            tasks.push(tokio::spawn(async move {
                store.update_status(&handle, next).await.map(|c| (next, c))
            }));
        }

        let mut changed = Vec::new();
        for task in tasks {
            if let Ok((next, change)) = task.await.unwrap()
                && change.changed()
            {
                changed.push(next);
            }
        }

        assert_eq!(changed.len(), 1);
        let stored = store.get(&handle).await.unwrap().unwrap();
        assert_eq!(stored.status, changed[0]);
    }

    #[tokio::test]
    async fn test_update_status_unknown_handle() {
        let store = InMemoryPaymentAttemptStore::new();
        let result = store
            .update_status(&PaymentHandle::from("pay-none"), PaymentStatus::Complete)
            .await;
        assert!(matches!(result, Err(TipError::PaymentNotFound(_))));
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tipflow::config::SettlementConfig;
use tipflow::application::settlement::TipSettlement;
use tipflow::domain::creator::{Creator, CreatorHandle};
use tipflow::domain::notification::Notification;
use tipflow::domain::ports::{Notifier, TipLedger};
use tipflow::domain::tip::{Tip, TipId, TipRequest};
use tipflow::error::{Result, TipError};
use tipflow::infrastructure::in_memory::{InMemoryCreatorDirectory, InMemoryTipLedger};
use rust_decimal::Decimal;

pub fn handle(s: &str) -> CreatorHandle {
    CreatorHandle::parse(s).unwrap()
}

/// alice: email + wallet, bob: wallet only, carol: email only.
pub fn directory() -> InMemoryCreatorDirectory {
    InMemoryCreatorDirectory::from_creators([
        Creator::new(handle("alice"), "Alice")
            .with_email("alice@example.com")
            .with_wallet("0xa11ce"),
        Creator::new(handle("bob"), "Bob").with_wallet("0xb0b"),
        Creator::new(handle("carol"), "Carol").with_email("carol@example.com"),
    ])
}

pub fn tip_request(handle: &str, amount: Decimal) -> TipRequest {
    TipRequest {
        creator_handle: handle.to_string(),
        amount,
        ..Default::default()
    }
}

/// Records every notification it is asked to deliver.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Counts attempts and always fails delivery.
#[derive(Default, Clone)]
pub struct FailingNotifier {
    attempts: Arc<Mutex<usize>>,
}

impl FailingNotifier {
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _notification: &Notification) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        Err(TipError::Notification("smtp relay unreachable".to_string()))
    }
}

/// A ledger whose storage is down.
#[derive(Default, Clone)]
pub struct FailingLedger;

#[async_trait]
impl TipLedger for FailingLedger {
    async fn create_tip(&self, _tip: Tip) -> Result<Tip> {
        Err(TipError::Persistence("connection reset".to_string()))
    }

    async fn get(&self, _id: &TipId) -> Result<Option<Tip>> {
        Ok(None)
    }
}

pub fn settlement_with(
    ledger: impl TipLedger + 'static,
    notifier: impl Notifier + 'static,
) -> TipSettlement {
    TipSettlement::new(
        Box::new(directory()),
        Box::new(ledger),
        Box::new(notifier),
        SettlementConfig::default(),
    )
}

pub fn in_memory_settlement() -> (TipSettlement, InMemoryTipLedger, RecordingNotifier) {
    let ledger = InMemoryTipLedger::new();
    let notifier = RecordingNotifier::default();
    let settlement = settlement_with(ledger.clone(), notifier.clone());
    (settlement, ledger, notifier)
}

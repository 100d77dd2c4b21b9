use crate::domain::payment::PaymentStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TipError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Creator not found: {0}")]
    CreatorNotFound(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Payment provider error: {0}")]
    PaymentProvider(String),
    #[error("Notification error: {0}")]
    Notification(String),
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),
    #[error("Invalid payment transition from {from} to {to}")]
    InvalidTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for TipError {
    fn from(err: rocksdb::Error) -> Self {
        TipError::Persistence(format!("RocksDB error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, TipError>;

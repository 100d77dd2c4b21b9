use crate::domain::ports::TipLedger;
use crate::domain::tip::{Tip, TipId};
use crate::error::{Result, TipError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing tip records.
pub const CF_TIPS: &str = "tips";

/// A persistent tip ledger backed by RocksDB.
///
/// Tips are stored as JSON in the `tips` column family, keyed by tip id.
/// RocksDB has no put-if-absent, so inserts are serialised through a mutex
/// to keep the existence check and the write atomic.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbTipLedger {
    db: Arc<DB>,
    write_guard: Arc<Mutex<()>>,
}

impl RocksDbTipLedger {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_tips = ColumnFamilyDescriptor::new(CF_TIPS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_tips])?;

        Ok(Self {
            db: Arc::new(db),
            write_guard: Arc::new(Mutex::new(())),
        })
    }

    fn tips_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_TIPS)
            .ok_or_else(|| TipError::Persistence("Tips column family not found".to_string()))
    }

    /// Number of tips on disk. Walks the whole column family.
    pub fn count(&self) -> Result<usize> {
        let cf = self.tips_cf()?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }
}

#[async_trait]
impl TipLedger for RocksDbTipLedger {
    async fn create_tip(&self, tip: Tip) -> Result<Tip> {
        let _guard = self.write_guard.lock().await;
        let cf = self.tips_cf()?;
        let key = tip.id.as_str().as_bytes();

        if self.db.get_pinned_cf(cf, key)?.is_some() {
            return Err(TipError::Persistence(format!(
                "Tip {} already exists",
                tip.id
            )));
        }

        let value = serde_json::to_vec(&tip)
            .map_err(|e| TipError::Persistence(format!("Serialization error: {}", e)))?;
        self.db.put_cf(cf, key, value)?;

        Ok(tip)
    }

    async fn get(&self, id: &TipId) -> Result<Option<Tip>> {
        let cf = self.tips_cf()?;
        match self.db.get_cf(cf, id.as_str().as_bytes())? {
            Some(bytes) => {
                let tip = serde_json::from_slice(&bytes).map_err(|e| {
                    TipError::Persistence(format!("Deserialization error: {}", e))
                })?;
                Ok(Some(tip))
            }
            None => Ok(None),
        }
    }
}

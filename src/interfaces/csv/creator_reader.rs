use crate::domain::creator::{Creator, CreatorHandle};
use crate::error::{Result, TipError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct CreatorRecord {
    handle: String,
    display_name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    wallet_address: Option<String>,
}

impl TryFrom<CreatorRecord> for Creator {
    type Error = TipError;

    fn try_from(record: CreatorRecord) -> Result<Self> {
        let handle = CreatorHandle::parse(&record.handle)?;
        let display_name = match record.display_name.trim() {
            "" => handle.to_string(),
            name => name.to_string(),
        };

        Ok(Creator {
            handle,
            display_name,
            email: record.email.filter(|e| !e.is_empty()),
            wallet_address: record.wallet_address.filter(|w| !w.is_empty()),
        })
    }
}

/// Reads creators from a CSV source with the header
/// `handle,display_name,email,wallet_address`.
pub struct CreatorReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CreatorReader<R> {
    /// Creates a new `CreatorReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and validates creators.
    pub fn creators(self) -> impl Iterator<Item = Result<Creator>> {
        self.reader
            .into_deserialize::<CreatorRecord>()
            .map(|result| result.map_err(TipError::from).and_then(Creator::try_from))
    }
}

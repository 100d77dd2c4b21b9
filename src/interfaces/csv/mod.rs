pub mod creator_reader;

use crate::error::Result;
use crate::infrastructure::in_memory::InMemoryCreatorDirectory;
use creator_reader::CreatorReader;
use std::fs::File;
use std::path::Path;
use tracing::warn;

/// Loads a creator directory from a CSV file.
///
/// Malformed rows are logged and skipped; a repeated handle replaces the
/// earlier row.
pub async fn load_directory(path: impl AsRef<Path>) -> Result<InMemoryCreatorDirectory> {
    let file = File::open(path.as_ref())?;
    let directory = InMemoryCreatorDirectory::new();

    for (row, creator) in CreatorReader::new(file).creators().enumerate() {
        match creator {
            Ok(creator) => {
                let handle = creator.handle.clone();
                if directory.insert(creator).await.is_some() {
                    warn!(%handle, row = row + 1, "duplicate creator handle, keeping the later row");
                }
            }
            Err(e) => warn!(row = row + 1, error = %e, "skipping creator row"),
        }
    }

    Ok(directory)
}

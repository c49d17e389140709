//! JSON implementation of the snapshot repository.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, menace::SavedStore, ports::StoreRepository};

/// Human-readable snapshots via `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository;

impl StoreRepository for JsonRepository {
    fn save(&self, snapshot: &SavedStore, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("write file {path:?}"),
            source,
        })
    }

    fn load(&self, path: &Path) -> Result<SavedStore> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let snapshot: SavedStore = serde_json::from_reader(BufReader::new(file))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

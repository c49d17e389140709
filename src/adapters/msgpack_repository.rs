//! MessagePack implementation of the snapshot repository.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, menace::SavedStore, ports::StoreRepository};

/// Compact binary snapshots via `rmp_serde`.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use matchbox_menace::{
///     adapters::MsgPackRepository,
///     menace::{Engine, InitialBeadSchedule, ReinforcementValues, SavedStore},
///     ports::StoreRepository,
///     tictactoe::Player,
/// };
///
/// let engine = Engine::seeded(
///     Player::O,
///     InitialBeadSchedule::default(),
///     ReinforcementValues::default(),
///     Some(1),
/// );
/// let repo = MsgPackRepository;
/// repo.save(&SavedStore::from_engine(&engine), Path::new("trained.msgpack"))?;
/// let loaded = repo.load(Path::new("trained.msgpack"))?;
/// # Ok::<(), matchbox_menace::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl StoreRepository for MsgPackRepository {
    fn save(&self, snapshot: &SavedStore, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, snapshot).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize snapshot to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

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

        let snapshot: SavedStore = rmp_serde::decode::from_read(BufReader::new(file)).map_err(
            |e| Error::SerializationContext {
                operation: "deserialize snapshot from MessagePack".to_string(),
                message: e.to_string(),
            },
        )?;

        snapshot.validate()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        menace::{Engine, InitialBeadSchedule, ReinforcementValues, SequentialOpponent},
        tictactoe::Player,
    };

    fn snapshot() -> SavedStore {
        let mut engine = Engine::seeded(
            Player::O,
            InitialBeadSchedule::michie(),
            ReinforcementValues::new(3, 1, -1),
            Some(3),
        );
        for _ in 0..10 {
            engine.play_game(&mut SequentialOpponent).unwrap();
        }
        SavedStore::from_engine(&engine)
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("store.msgpack");

        let repo = MsgPackRepository::new();
        let saved = snapshot();
        repo.save(&saved, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = MsgPackRepository.load(&temp_dir.path().join("missing.msgpack"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_garbage_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.msgpack");
        std::fs::write(&path, b"not msgpack at all").unwrap();
        assert!(MsgPackRepository.load(&path).is_err());
    }
}

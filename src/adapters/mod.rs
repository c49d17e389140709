//! Adapters implementing domain ports.

pub mod json_repository;
pub mod msgpack_repository;
pub mod scripted_draws;

use std::path::Path;

pub use json_repository::JsonRepository;
pub use msgpack_repository::MsgPackRepository;
pub use scripted_draws::ScriptedDraws;

use crate::ports::StoreRepository;

/// JSON for `.json` paths, MessagePack for everything else
pub fn repository_for_path(path: &Path) -> Box<dyn StoreRepository> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(JsonRepository)
    } else {
        Box::new(MsgPackRepository)
    }
}

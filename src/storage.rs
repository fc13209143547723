//! JSONファイルによるキー・バリュー型ストレージ
//!
//! ブラウザの localStorage と同じく、キーごとに文字列を保持する。
//! 書き込みのたびに一時ファイル経由でファイル全体を置き換える。

use crate::error::{Result, SegmentBoardError};
use segment_board_common::{AcceptedMedia, BoardState, Error, ItemStore, KeyValueStorage};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// ファイルを開く（存在しなければ空）
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    SegmentBoardError::Config(format!("ストレージファイルが不正です {}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    /// 既存の内容を読まずに開く
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let content = serde_json::to_string_pretty(&self.entries)?;
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// ストレージファイルからボードを開く
///
/// ファイルやスナップショットが読めない場合は警告して空で始める。
/// 次の書き込みで壊れた内容は置き換えられる。
pub fn open_board(path: &Path, accepted: AcceptedMedia) -> Result<BoardState<FileStorage>> {
    let storage = match FileStorage::open(path) {
        Ok(storage) => storage,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "storage file is unreadable, starting empty");
            FileStorage::empty(path)
        }
    };

    let store = match ItemStore::load(storage) {
        Ok(store) => store,
        Err(Error::Json(e)) => {
            warn!(path = %path.display(), error = %e, "stored board is malformed, starting empty");
            ItemStore::empty(FileStorage::open(path).unwrap_or_else(|_| FileStorage::empty(path)))
        }
        Err(e) => return Err(e.into()),
    };

    Ok(BoardState::new(store, accepted))
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> segment_board_common::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> segment_board_common::Result<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());

        if let Err(e) = self.write() {
            match previous {
                Some(previous) => self.entries.insert(key.to_string(), previous),
                None => self.entries.remove(key),
            };
            return Err(e.into());
        }

        debug!(path = %self.path.display(), key, bytes = value.len(), "storage written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("storage.json")).unwrap();
        assert_eq!(storage.get("tasks").unwrap(), None);
    }

    #[test]
    fn test_set_creates_parent_and_reopens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set("tasks", "{\"procesar\":[]}").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("tasks").unwrap().as_deref(), Some("{\"procesar\":[]}"));
    }

    #[test]
    fn test_open_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(FileStorage::open(&path), Err(SegmentBoardError::Config(_))));
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        // 親がファイルなので書き込めない
        let mut storage = FileStorage::empty(blocker.join("storage.json"));
        assert!(storage.set("tasks", "{}").is_err());
        assert_eq!(storage.get("tasks").unwrap(), None);
    }

    #[test]
    fn test_open_board_truncated_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"tasks": "{\"procesar\":["#).unwrap();

        let mut board = open_board(&path, AcceptedMedia::standard()).unwrap();
        assert!(board.store().items(segment_board_common::Category::Procesar).is_empty());

        board.open_modal();
        board.set_title("Clip A");
        board.set_media(Some(segment_board_common::MediaFile::new("a.mp4", "video/mp4", vec![0; 8])));
        board.submit().unwrap();

        let reopened = open_board(&path, AcceptedMedia::standard()).unwrap();
        assert_eq!(reopened.store().items(segment_board_common::Category::Procesar).len(), 1);
    }

    #[test]
    fn test_open_board_malformed_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"tasks": "{\"procesar\": 42}"}"#).unwrap();

        let board = open_board(&path, AcceptedMedia::standard()).unwrap();
        assert_eq!(board.store().counts().iter().map(|(_, n)| n).sum::<usize>(), 0);
    }
}

//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use segment_board::config::Config;
use segment_board::error::SegmentBoardError;
use segment_board::media::load_media;
use segment_board::storage::FileStorage;
use segment_board_common::{
    AcceptedMedia, BoardState, Category, Error, ItemStore, MediaFile, MemoryStorage, ValidationErrors,
};
use std::path::Path;
use tempfile::tempdir;

/// 存在しないファイルを追加しようとした場合
#[test]
fn test_load_nonexistent_media() {
    let result = load_media(Path::new("/nonexistent/path/12345/a.mp4"), None);
    assert!(matches!(result, Err(SegmentBoardError::FileNotFound(_))));
}

/// ディレクトリはファイルとして扱わない
#[test]
fn test_load_directory_as_media() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = load_media(dir.path(), None);
    assert!(matches!(result, Err(SegmentBoardError::FileNotFound(_))));
}

/// 壊れたストレージファイル
#[test]
fn test_corrupt_storage_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(matches!(FileStorage::open(&path), Err(SegmentBoardError::Config(_))));
}

/// ストレージ内のスナップショットが壊れている場合は Json エラー
#[test]
fn test_malformed_snapshot() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("storage.json");
    std::fs::write(&path, r#"{"tasks": "{\"procesar\": 42"}"#).unwrap();

    let storage = FileStorage::open(&path).unwrap();
    assert!(matches!(ItemStore::load(storage), Err(Error::Json(_))));
}

/// http/https 以外のURLは設定できない
#[test]
fn test_invalid_api_url() {
    let mut config = Config::default();
    let result = config.set_api_base_url("ftp://example.com");
    assert!(matches!(result, Err(SegmentBoardError::Config(_))));
}

/// 形式違反はフォームを閉じない
#[test]
fn test_rejected_format_keeps_modal_open() {
    let mut board = BoardState::new(ItemStore::load(MemoryStorage::new()).unwrap(), AcceptedMedia::standard());
    board.open_modal();
    board.set_title("Doc");
    board.set_media(Some(MediaFile::new("notes.txt", "text/plain", b"hi".to_vec())));

    let result = board.submit();
    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(board.is_modal_open());
    assert!(board.store().items(Category::Procesar).is_empty());
    assert!(!board.errors().media.is_empty());
}

/// SegmentBoardErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        SegmentBoardError::Config("テスト設定エラー".to_string()),
        SegmentBoardError::FileNotFound("a.mp4".to_string()),
        SegmentBoardError::Prompt("入力中断".to_string()),
        SegmentBoardError::Board(Error::NoFileToSend),
        SegmentBoardError::Board(Error::ItemNotFound {
            category: Category::Segmentar,
            index: 4,
        }),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "Error display should not be empty");
    }

    let err = SegmentBoardError::Board(Error::Validation(ValidationErrors {
        title: "title is required.".into(),
        media: String::new(),
    }));
    assert_eq!(err.to_string(), "Validation failed: title is required.");
}

/// io::Error からの変換
#[test]
fn test_error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: SegmentBoardError = io_err.into();
    assert!(matches!(err, SegmentBoardError::Io(_)));
}

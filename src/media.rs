//! ローカルファイルの読み込み

use crate::error::{Result, SegmentBoardError};
use segment_board_common::{MediaFile, MediaMeta};
use std::path::Path;
use tracing::{debug, warn};

const MIME_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
];

const FALLBACK_MIME: &str = "application/octet-stream";

/// 拡張子からMIMEタイプを推定
pub fn guess_mime_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
        return FALLBACK_MIME;
    };

    MIME_TYPES
        .iter()
        .find(|(e, _)| *e == ext.as_str())
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK_MIME)
}

/// ファイルを読み込んで MediaFile を作る
///
/// `source` と表示用の参照には絶対パスを記録する。
pub fn load_media(path: &Path, mime_override: Option<&str>) -> Result<MediaFile> {
    if !path.is_file() {
        return Err(SegmentBoardError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime_type = mime_override
        .map(str::to_string)
        .unwrap_or_else(|| guess_mime_type(path).to_string());
    let location = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string();

    debug!(%name, %mime_type, size = bytes.len(), "media loaded");

    Ok(MediaFile::new(name, mime_type, bytes)
        .with_source(location.clone())
        .with_url(location))
}

/// 記録済みの `source` からバイト列を読み直す
///
/// 名前とMIMEタイプは元の項目のものを使う。
pub fn rehydrate(meta: &MediaMeta) -> Option<MediaFile> {
    let source = meta.source.as_deref()?;

    match std::fs::read(source) {
        Ok(bytes) => Some(
            MediaFile::new(meta.name.clone(), meta.mime_type.clone(), bytes)
                .with_source(source)
                .with_url(source),
        ),
        Err(e) => {
            warn!(%source, error = %e, "media source is not readable");
            None
        }
    }
}

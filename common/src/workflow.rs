//! 送信ワークフロー（プラットフォーム非依存部分）
//!
//! エンドポイントの選択と、HTTP応答から送信結果・ダウンロードへの変換を行う。
//! 実際の通信は各フロントエンド（reqwest / fetch）が担当する。

use crate::types::{Category, MediaFile, MediaMeta, SendOutcome};

pub const IMAGE_DETECTION_PATH: &str = "/API/Get/Image/Detection";
pub const VIDEO_DETECTION_PATH: &str = "/API/Get/Video/Detection";

/// multipartのフィールド名
pub const UPLOAD_FIELD: &str = "file";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

pub const NO_FILE_MESSAGE: &str = "no file to send";
pub const SUCCESS_MESSAGE: &str = "file downloaded successfully";

/// 検出エンドポイントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionKind {
    Image,
    Video,
}

impl DetectionKind {
    pub fn for_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("video/") {
            DetectionKind::Video
        } else {
            DetectionKind::Image
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            DetectionKind::Image => IMAGE_DETECTION_PATH,
            DetectionKind::Video => VIDEO_DETECTION_PATH,
        }
    }
}

/// 検出APIのベースURL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// MIMEタイプから送信先URLを決める
    pub fn route(&self, mime_type: &str) -> String {
        format!("{}{}", self.base_url, DetectionKind::for_mime(mime_type).path())
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

/// 送信1回分の要求
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub category: Category,
    pub index: usize,
    pub item_id: u64,
    pub url: String,
    pub media: MediaFile,
}

/// トランスポートから返る結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendReply {
    /// 2xx: 本文全体が処理済みファイル
    Ok(Vec<u8>),
    /// 2xx以外
    Status { status: u16, body: String },
    /// 応答なし（接続失敗など）
    Transport(String),
}

/// ダウンロードとして提示するファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub fn download_name(original: &str) -> String {
    format!("segmented_{}", original)
}

pub fn server_error(body: &str) -> SendOutcome {
    SendOutcome::Error(format!("server error: {}", body))
}

pub fn transport_error(message: &str) -> SendOutcome {
    SendOutcome::Error(format!("failed to send file: {}", message))
}

pub fn save_error(message: &str) -> SendOutcome {
    SendOutcome::Error(format!("failed to save file: {}", message))
}

/// 応答を送信結果と（成功時は）ダウンロードに変換する
pub fn resolve_reply(reply: SendReply, media: &MediaMeta) -> (SendOutcome, Option<Download>) {
    match reply {
        SendReply::Ok(bytes) => {
            let download = Download {
                file_name: download_name(&media.name),
                mime_type: media.mime_type.clone(),
                bytes,
            };
            (SendOutcome::Success(SUCCESS_MESSAGE.to_string()), Some(download))
        }
        SendReply::Status { body, .. } => (server_error(&body), None),
        SendReply::Transport(message) => (transport_error(&message), None),
    }
}

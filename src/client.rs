//! 検出APIクライアント（reqwest）
//!
//! ファイルを multipart の `file` フィールドで1回だけPOSTする。
//! タイムアウト・リトライは行わない。

use crate::error::Result;
use reqwest::multipart::{Form, Part};
use segment_board_common::{SendReply, SendRequest, UPLOAD_FIELD};
use tracing::debug;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct DetectionClient {
    http: reqwest::Client,
}

impl DetectionClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("segment-board/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// ファイルを送信し、応答を SendReply に変換する
    pub async fn post_file(&self, request: &SendRequest) -> SendReply {
        let meta = &request.media.meta;
        let mime_type = if meta.mime_type.is_empty() {
            FALLBACK_MIME
        } else {
            meta.mime_type.as_str()
        };

        // リクエスト本文用の1回だけコピーする
        let part = match Part::bytes(request.media.bytes.to_vec())
            .file_name(meta.name.clone())
            .mime_str(mime_type)
        {
            Ok(part) => part,
            Err(e) => return SendReply::Transport(e.to_string()),
        };
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(url = %request.url, file = %meta.name, size = meta.size, "posting media");

        let response = match self.http.post(&request.url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => return SendReply::Transport(e.to_string()),
        };

        let status = response.status();
        debug!(status = status.as_u16(), "detection response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return SendReply::Status {
                status: status.as_u16(),
                body,
            };
        }

        match response.bytes().await {
            Ok(bytes) => SendReply::Ok(bytes.to_vec()),
            Err(e) => SendReply::Transport(e.to_string()),
        }
    }
}

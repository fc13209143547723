//! ボードの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Category: タブ（procesar / segmentar）
//! - MediaMeta: 永続化されるファイル情報
//! - MediaFile: メモリ上のみで保持するファイル本体
//! - Item: ボードの1項目

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// カテゴリ（タブ）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Procesar,
    Segmentar,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Procesar, Category::Segmentar];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Procesar => "procesar",
            Category::Segmentar => "segmentar",
        }
    }

    /// 画面表示用のラベル
    pub fn label(&self) -> &'static str {
        match self {
            Category::Procesar => "Procesar",
            Category::Segmentar => "Segmentar",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "procesar" => Ok(Category::Procesar),
            "segmentar" => Ok(Category::Segmentar),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

/// 永続化されるファイル情報（バイト列は含まない）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMeta {
    pub name: String,

    #[serde(rename = "type", default)]
    pub mime_type: String,

    #[serde(default)]
    pub size: u64,

    /// バイト列を再読込できる場所（CLIではファイルパス）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl MediaMeta {
    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    /// 拡張子（ドットなし）
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext)
    }
}

/// ファイル本体。メモリ上のみで保持する
///
/// バイト列は clone しても共有される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub meta: MediaMeta,
    pub bytes: Arc<[u8]>,
    /// 表示用の参照（ブラウザではobject URL）
    pub url: Option<String>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            meta: MediaMeta {
                name: name.into(),
                mime_type: mime_type.into(),
                size: bytes.len() as u64,
                source: None,
            },
            bytes: bytes.into(),
            url: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.meta.source = Some(source.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// 送信結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendOutcome {
    Error(String),
    Success(String),
}

impl SendOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, SendOutcome::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SendOutcome::Error(m) | SendOutcome::Success(m) => m,
        }
    }
}

/// ボードの1項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub id: u64,

    pub title: String,

    pub media: MediaMeta,

    #[serde(skip)]
    pub media_url: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub response: Option<SendOutcome>,
}

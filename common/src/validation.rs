//! 入力フォームの検証
//!
//! 受け付けるファイル形式は設定（AcceptedMedia）で切り替える。

use crate::error::Error;
use crate::types::{MediaFile, MediaMeta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TITLE_REQUIRED: &str = "title is required.";
pub const FILE_REQUIRED: &str = "file is required.";
pub const FORMAT_NOT_ALLOWED: &str = "only the accepted image/video formats are allowed.";

/// 受付形式のプリセット
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcceptPreset {
    /// JPG画像とMP4動画
    #[default]
    Standard,
    /// 動画のみ（形式は問わない）
    VideoAny,
}

impl FromStr for AcceptPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(AcceptPreset::Standard),
            "video-any" | "video" => Ok(AcceptPreset::VideoAny),
            _ => Err(Error::Config(format!(
                "Unknown accept preset: {}. Use standard or video-any",
                s
            ))),
        }
    }
}

impl fmt::Display for AcceptPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptPreset::Standard => write!(f, "standard"),
            AcceptPreset::VideoAny => write!(f, "video-any"),
        }
    }
}

/// MIMEタイプと拡張子の組み合わせ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRule {
    /// 完全一致、または "video/*" のようなワイルドカード
    pub mime: String,
    /// 空なら拡張子は問わない
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl MediaRule {
    pub fn new(mime: &str, extensions: &[&str]) -> Self {
        Self {
            mime: mime.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn matches(&self, meta: &MediaMeta) -> bool {
        let mime_ok = match self.mime.strip_suffix('*') {
            Some(prefix) => meta.mime_type.to_lowercase().starts_with(&prefix.to_lowercase()),
            None => meta.mime_type.eq_ignore_ascii_case(&self.mime),
        };
        if !mime_ok {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        match meta.extension() {
            Some(ext) => self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// 受け付けるファイル形式の集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedMedia {
    rules: Vec<MediaRule>,
}

impl AcceptedMedia {
    pub fn standard() -> Self {
        Self {
            rules: vec![
                MediaRule::new("image/jpeg", &["jpg"]),
                MediaRule::new("video/mp4", &["mp4"]),
            ],
        }
    }

    pub fn video_any() -> Self {
        Self {
            rules: vec![MediaRule::new("video/*", &[])],
        }
    }

    pub fn from_preset(preset: AcceptPreset) -> Self {
        match preset {
            AcceptPreset::Standard => Self::standard(),
            AcceptPreset::VideoAny => Self::video_any(),
        }
    }

    pub fn with_rule(mut self, rule: MediaRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[MediaRule] {
        &self.rules
    }

    pub fn accepts(&self, meta: &MediaMeta) -> bool {
        self.rules.iter().any(|r| r.matches(meta))
    }

    /// `<input type="file">` の accept 属性値
    pub fn input_accept(&self) -> String {
        let mut parts = Vec::new();
        for rule in &self.rules {
            if rule.extensions.is_empty() {
                parts.push(rule.mime.clone());
            } else {
                parts.extend(rule.extensions.iter().map(|e| format!(".{}", e)));
            }
        }
        parts.join(",")
    }
}

impl Default for AcceptedMedia {
    fn default() -> Self {
        Self::standard()
    }
}

/// 入力中のフォーム
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub title: String,
    pub media: Option<MediaFile>,
    pub description: String,
}

/// 項目ごとの検証エラー（空文字はエラーなし）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub title: String,
    pub media: String,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.media.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = [self.title.as_str(), self.media.as_str()]
            .into_iter()
            .filter(|m| !m.is_empty())
            .collect();
        write!(f, "{}", messages.join(" "))
    }
}

/// フォームを検証し、項目ごとのエラーを返す
pub fn validate(draft: &FormDraft, accepted: &AcceptedMedia) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.title.trim().is_empty() {
        errors.title = TITLE_REQUIRED.to_string();
    }

    match &draft.media {
        None => errors.media = FILE_REQUIRED.to_string(),
        Some(file) if !accepted.accepts(&file.meta) => {
            errors.media = FORMAT_NOT_ALLOWED.to_string();
        }
        Some(_) => {}
    }

    errors
}

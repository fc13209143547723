//! Segment Board Common Library
//!
//! CLIとWeb(WASM)で共有される型・項目ストア・送信ワークフロー

pub mod types;
pub mod error;
pub mod validation;
pub mod storage;
pub mod store;
pub mod board;
pub mod workflow;

pub use types::{Category, Item, MediaFile, MediaMeta, SendOutcome};
pub use error::{Error, Result};
pub use validation::{validate, AcceptPreset, AcceptedMedia, FormDraft, MediaRule, ValidationErrors};
pub use storage::{KeyValueStorage, MemoryStorage, STORAGE_KEY};
pub use store::ItemStore;
pub use board::{BoardState, ItemRow};
pub use workflow::{
    download_name, resolve_reply, save_error, Download, DetectionKind, Endpoints, SendReply, SendRequest,
    DEFAULT_API_BASE_URL, UPLOAD_FIELD,
};

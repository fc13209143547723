//! Segment Board CLI
//!
//! 項目ストア・送信ワークフローは segment_board_common を使用し、
//! ここではファイルストレージ・HTTPクライアント・ダウンロード保存を提供する。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod media;
pub mod report;
pub mod send;
pub mod storage;

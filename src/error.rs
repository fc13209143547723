use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegmentBoardError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error(transparent)]
    Board(#[from] segment_board_common::Error),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, SegmentBoardError>;

//! 送信処理（CLI）
//!
//! 1. ファイル本体が無ければ `source` から読み直す（端末なら再指定を求める）
//! 2. 送信開始 → POST → 応答の解釈
//! 3. 成功時はダウンロードディレクトリに `segmented_<name>` を保存
//! 4. 結果を項目に記録

use crate::client::DetectionClient;
use crate::error::{Result, SegmentBoardError};
use crate::media;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use segment_board_common::workflow::NO_FILE_MESSAGE;
use segment_board_common::{
    resolve_reply, save_error, BoardState, Category, Download, Endpoints, Error, KeyValueStorage, SendOutcome,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SendOptions {
    pub output_dir: PathBuf,
    /// ファイルが読めないとき再指定を求める
    pub prompt: bool,
    pub progress: bool,
}

impl SendOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prompt: false,
            progress: false,
        }
    }
}

pub async fn send_item<S: KeyValueStorage>(
    board: &mut BoardState<S>,
    client: &DetectionClient,
    endpoints: &Endpoints,
    category: Category,
    index: usize,
    options: &SendOptions,
) -> Result<SendOutcome> {
    if board.store().item(category, index).is_none() {
        return Err(Error::ItemNotFound { category, index }.into());
    }

    ensure_media(board, category, index, options.prompt)?;

    let request = match board.begin_send(category, index, endpoints) {
        Ok(request) => request,
        Err(Error::NoFileToSend) => {
            warn!(%category, index, "no media bytes available");
            return Ok(SendOutcome::Error(NO_FILE_MESSAGE.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let spinner = options.progress.then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner());
        spinner.set_message(format!("{} → {}", request.media.meta.name, request.url));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    });

    let reply = client.post_file(&request).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let (mut outcome, download) = resolve_reply(reply, &request.media.meta);
    if let Some(download) = download {
        match save_download(&options.output_dir, &download) {
            Ok(path) => info!(path = %path.display(), bytes = download.bytes.len(), "download saved"),
            Err(e) => outcome = save_error(&e.to_string()),
        }
    }

    info!(%category, index, error = outcome.is_error(), message = outcome.message(), "send finished");
    board.finish_send(&request, outcome.clone())?;
    Ok(outcome)
}

/// ファイル本体がメモリに無ければ読み直して結び付ける
fn ensure_media<S: KeyValueStorage>(
    board: &mut BoardState<S>,
    category: Category,
    index: usize,
    prompt: bool,
) -> Result<()> {
    let Some(item) = board.store().item(category, index) else {
        return Ok(());
    };
    if board.store().media(item.id).is_some() {
        return Ok(());
    }

    let meta = item.media.clone();
    if let Some(file) = media::rehydrate(&meta) {
        board.reattach_media(category, index, file)?;
        return Ok(());
    }

    if !prompt || !std::io::stdin().is_terminal() {
        return Ok(());
    }

    println!("  {} を読み込めません", meta.name);
    let input: String = Input::new()
        .with_prompt(format!("{} のパス (空でスキップ)", meta.name))
        .allow_empty(true)
        .interact_text()
        .map_err(|e| SegmentBoardError::Prompt(e.to_string()))?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    let file = media::load_media(Path::new(trimmed), Some(&meta.mime_type))?;
    // 元のファイル名で照合する
    if file.meta.name != meta.name {
        return Err(Error::MediaMismatch(format!("expected {}, got {}", meta.name, file.meta.name)).into());
    }
    board.reattach_media(category, index, file)?;
    Ok(())
}

/// ダウンロードを保存し、保存先パスを返す
pub fn save_download(output_dir: &Path, download: &Download) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&download.file_name);
    std::fs::write(&path, &download.bytes)?;
    Ok(path)
}

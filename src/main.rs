use clap::Parser;
use segment_board::{cli, client, config, error, report, send, storage};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use segment_board_common::{BoardState, Category, Error, SendOutcome};
use std::path::PathBuf;
use storage::FileStorage;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Add { tab, title, file, description, mime } => {
            let mut board = open_board(&config, cli.storage)?;
            board.switch_tab(tab);
            board.open_modal();
            board.set_title(title.clone());
            board.set_description(description);

            let media = match file {
                Some(path) => Some(segment_board::media::load_media(&path, mime.as_deref())?),
                None => None,
            };
            board.set_media(media);

            match board.submit() {
                Ok(index) => {
                    let rows = board.rows(tab);
                    let row = &rows[index];
                    println!(
                        "✔ {} に追加しました: [{}] {} ({}, {} bytes)",
                        tab.label(),
                        index,
                        title,
                        row.media.mime_type,
                        row.media.size
                    );
                }
                Err(Error::Validation(errors)) => {
                    if !errors.title.is_empty() {
                        eprintln!("  title: {}", errors.title);
                    }
                    if !errors.media.is_empty() {
                        eprintln!("  file: {}", errors.media);
                    }
                    return Err(Error::Validation(errors).into());
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::List { tab } => {
            let board = open_board(&config, cli.storage)?;
            let tabs: Vec<Category> = match tab {
                Some(tab) => vec![tab],
                None => Category::ALL.to_vec(),
            };

            let sections: Vec<String> = tabs
                .iter()
                .map(|c| report::render_tab(*c, &board.rows(*c)))
                .collect();
            println!("{}", sections.join("\n\n"));
        }

        Commands::Send { tab, index, output_dir, no_prompt } => {
            println!("📤 segment-board - 送信\n");

            let mut board = open_board(&config, cli.storage)?;
            let client = client::DetectionClient::new()?;
            let endpoints = config.endpoints();
            let options = send::SendOptions {
                output_dir: output_dir.unwrap_or_else(|| config.download_dir()),
                prompt: !no_prompt,
                progress: true,
            };

            let outcome = send::send_item(&mut board, &client, &endpoints, tab, index, &options).await?;
            match outcome {
                SendOutcome::Success(message) => {
                    println!("✔ {}", message);
                    println!("  保存先: {}", options.output_dir.display());
                }
                SendOutcome::Error(message) => println!("✖ {}", message),
            }
        }

        Commands::Config { set_api_url, set_download_dir, accept, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(url) = set_api_url {
                config.set_api_base_url(&url)?;
                changed = true;
            }

            if let Some(dir) = set_download_dir {
                config.download_dir = Some(dir);
                changed = true;
            }

            if let Some(preset) = accept {
                config.accepted_media = preset;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  APIベースURL: {}", config.api_base_url());
                println!("  ダウンロード先: {}", config.download_dir().display());
                println!("  受付形式: {}", config.accepted_media);
                println!("  ストレージ: {}", config.storage_path()?.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// ストレージを開いてボードを作る
fn open_board(config: &Config, storage_override: Option<PathBuf>) -> Result<BoardState<FileStorage>> {
    let path = match storage_override {
        Some(path) => path,
        None => config.storage_path()?,
    };
    storage::open_board(&path, config.accepted())
}

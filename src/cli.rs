use clap::{Parser, Subcommand};
use segment_board_common::{AcceptPreset, Category};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "segment-board")]
#[command(about = "画像・動画を登録し、セグメンテーションAPIへ送信するボード", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ストレージファイル（設定より優先）
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 項目を追加
    Add {
        /// 追加先タブ (procesar/segmentar)
        #[arg(short, long, default_value = "procesar")]
        tab: Category,

        /// タイトル（必須）
        #[arg(long, default_value = "")]
        title: String,

        /// 画像または動画ファイル（必須）
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// 説明
        #[arg(short, long, default_value = "")]
        description: String,

        /// MIMEタイプを指定（省略時は拡張子から推定）
        #[arg(long)]
        mime: Option<String>,
    },

    /// 項目一覧を表示
    List {
        /// 表示するタブ（省略時は全タブ）
        #[arg(short, long)]
        tab: Option<Category>,
    },

    /// 項目のファイルを検出APIへ送信
    Send {
        /// 対象タブ
        #[arg(short, long, default_value = "procesar")]
        tab: Category,

        /// 項目のインデックス（list で表示される番号）
        #[arg(required = true)]
        index: usize,

        /// ダウンロード保存先（省略時は設定値またはカレント）
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// ファイルが読めないときに再指定を求めない
        #[arg(long)]
        no_prompt: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 検出APIのベースURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// ダウンロード保存先を設定
        #[arg(long)]
        set_download_dir: Option<PathBuf>,

        /// 受け付けるファイル形式 (standard/video-any)
        #[arg(long)]
        accept: Option<AcceptPreset>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

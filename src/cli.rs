use clap::{Parser, Subcommand};
use rhythm_ocr_core::ResolverConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rhythm-ocr")]
#[command(about = "リザルト画面のOCR・曲カタログ照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スクリーンショットフォルダを処理してJSONを出力
    Run {
        /// スクリーンショットフォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル（デフォルト: songs_results.json）
        #[arg(short, long, default_value = "songs_results.json")]
        output: PathBuf,

        /// 曲データJSONファイル（指定時はAPIを使わない）
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// 曲データを再取得
        #[arg(long)]
        refresh: bool,

        /// 1枚ごとの詳細結果を出力するJSONファイル
        #[arg(long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// OCR結果を手入力して照合
    Resolve {
        /// 曲名
        #[arg(short, long)]
        song: String,

        /// 曲師
        #[arg(short, long, default_value = "")]
        artist: String,

        /// 難易度
        #[arg(short, long)]
        difficulty: String,

        /// 曲データJSONファイル
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// 曲データキャッシュ管理
    Catalog {
        /// 曲データを再取得
        #[arg(long)]
        refresh: bool,

        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 曲データAPIのURLを設定
        #[arg(long)]
        set_catalog_url: Option<String>,

        /// OCRコマンドを設定
        #[arg(long)]
        set_ocr_command: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 照合閾値（省略時は設定ファイルの値）
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct ThresholdArgs {
    /// 難易度の閾値 (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub difficulty_threshold: Option<u8>,

    /// 曲師の閾値 (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub artist_threshold: Option<u8>,

    /// 曲名の閾値 (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub title_threshold: Option<u8>,
}

impl ThresholdArgs {
    pub fn apply(&self, mut config: ResolverConfig) -> ResolverConfig {
        if let Some(v) = self.difficulty_threshold {
            config.difficulty_threshold = v;
        }
        if let Some(v) = self.artist_threshold {
            config.artist_threshold = v;
        }
        if let Some(v) = self.title_threshold {
            config.title_threshold = v;
        }
        config
    }
}

use crate::error::{RhythmOcrError, Result};
use crate::screen::ScreenConfig;
use rhythm_ocr_core::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_CATALOG_URL: &str = "https://api.prp.icel.site/songs/";
const CATALOG_URL_ENV: &str = "RHYTHM_OCR_CATALOG_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog_url: String,
    pub catalog_max_age_hours: u64,
    pub difficulty_threshold: u8,
    pub artist_threshold: u8,
    pub title_threshold: u8,
    /// OCRコマンド（切り出した画像のパスを `{input}` で受け取る）
    pub ocr_command: String,
    pub ocr_args: Vec<String>,
    pub timeout_seconds: u64,
    /// 画面判定の座標・色範囲
    pub screen: ScreenConfig,
}

impl Default for Config {
    fn default() -> Self {
        let thresholds = ResolverConfig::default();
        Self {
            catalog_url: DEFAULT_CATALOG_URL.into(),
            catalog_max_age_hours: 24,
            difficulty_threshold: thresholds.difficulty_threshold,
            artist_threshold: thresholds.artist_threshold,
            title_threshold: thresholds.title_threshold,
            ocr_command: "tesseract".into(),
            ocr_args: vec!["{input}".into(), "stdout".into(), "--psm".into(), "7".into()],
            timeout_seconds: 30,
            screen: ScreenConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 読み込めない設定ファイルはデフォルト値で置き換える（設定修復用）
    pub fn load_or_default() -> Result<Self> {
        Ok(Self::load_or_default_from(&Self::config_path()?))
    }

    pub fn load_or_default_from(config_path: &Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            warn!("設定ファイルを読み込めないためデフォルト値を使用: {}", e);
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RhythmOcrError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("rhythm-ocr").join("config.json"))
    }

    /// 曲データキャッシュの保存先
    pub fn cache_dir() -> Result<PathBuf> {
        let base = dirs::cache_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| RhythmOcrError::Config("キャッシュディレクトリが見つかりません".into()))?;
        Ok(base.join("rhythm-ocr"))
    }

    pub fn catalog_url(&self) -> String {
        // 環境変数を優先
        std::env::var(CATALOG_URL_ENV).unwrap_or_else(|_| self.catalog_url.clone())
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            difficulty_threshold: self.difficulty_threshold,
            artist_threshold: self.artist_threshold,
            title_threshold: self.title_threshold,
        }
    }

    pub fn set_catalog_url(&mut self, url: String) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RhythmOcrError::Config(format!("URLが不正です: {}", url)));
        }
        self.catalog_url = url;
        self.save()
    }

    pub fn set_ocr_command(&mut self, command: String) -> Result<()> {
        self.ocr_command = command;
        self.save()
    }
}

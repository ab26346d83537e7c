pub mod cache;

pub use cache::CatalogCache;

use crate::config::Config;
use crate::error::{RhythmOcrError, Result};
use rhythm_ocr_core::{parse_entries, CatalogEntry, CatalogIndex};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// 曲データの取得設定
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub url: String,
    pub cache_dir: PathBuf,
    pub max_age_hours: u64,
    pub timeout_seconds: u64,
    /// キャッシュを無視して再取得する
    pub refresh: bool,
}

impl CatalogOptions {
    pub fn from_config(config: &Config, refresh: bool) -> Result<Self> {
        Ok(Self {
            url: config.catalog_url(),
            cache_dir: Config::cache_dir()?,
            max_age_hours: config.catalog_max_age_hours,
            timeout_seconds: config.timeout_seconds,
            refresh,
        })
    }
}

/// 曲データの取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Cache,
    Network,
    /// 取得に失敗したため期限切れキャッシュを使用
    StaleCache,
    File,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Cache => write!(f, "キャッシュ"),
            CatalogSource::Network => write!(f, "ネットワーク"),
            CatalogSource::StaleCache => write!(f, "期限切れキャッシュ"),
            CatalogSource::File => write!(f, "ファイル"),
        }
    }
}

/// 曲データAPIから全譜面を取得
pub async fn fetch_catalog(url: &str, timeout: Duration) -> Result<Vec<CatalogEntry>> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    Ok(parse_entries(&body)?)
}

/// ローカルのJSONファイルから曲データを読み込む
pub fn load_catalog_file(path: &Path) -> Result<CatalogIndex> {
    if !path.exists() {
        return Err(RhythmOcrError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(CatalogIndex::from_json(&content)?)
}

/// キャッシュが有効ならキャッシュから、そうでなければ取得して保存する
///
/// 取得に失敗した場合、期限切れでもキャッシュがあればそれを使う。
/// 譜面が1件もないキャッシュは無いものとして扱う。
pub async fn load_or_fetch(options: &CatalogOptions) -> Result<(CatalogIndex, CatalogSource)> {
    let cached = CatalogCache::load(&options.cache_dir).filter(|cache| !cache.is_empty());
    let max_age = chrono::Duration::hours(options.max_age_hours as i64);

    if let Some(cache) = &cached {
        if !options.refresh && !cache.is_stale(max_age) {
            info!(songs = cache.len(), "曲データをキャッシュから読み込み");
            return Ok((cache.clone().into_index(), CatalogSource::Cache));
        }
    }

    match fetch_catalog(&options.url, Duration::from_secs(options.timeout_seconds)).await {
        Ok(songs) => {
            info!(songs = songs.len(), url = %options.url, "曲データを取得");
            let cache = CatalogCache::new(options.url.clone(), songs);
            if let Err(e) = cache.save(&options.cache_dir) {
                warn!("キャッシュ保存失敗: {}", e);
            }
            Ok((cache.into_index(), CatalogSource::Network))
        }
        Err(e) => match cached {
            Some(cache) => {
                warn!("曲データ取得失敗、期限切れキャッシュを使用: {}", e);
                Ok((cache.into_index(), CatalogSource::StaleCache))
            }
            None => Err(e),
        },
    }
}

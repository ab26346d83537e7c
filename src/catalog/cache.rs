//! 曲データキャッシュモジュール
//!
//! 取得した曲データを取得日時付きで保存し、期限内であれば
//! ネットワーク取得をスキップする。

use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use rhythm_ocr_core::{CatalogEntry, CatalogIndex};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

const CACHE_FILE_NAME: &str = "songs_data.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCache {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 取得元URL
    source_url: String,
    /// 取得日時
    fetched_at: DateTime<Utc>,
    /// 曲データ
    songs: Vec<CatalogEntry>,
}

impl CatalogCache {
    const CURRENT_VERSION: u32 = 1;

    pub fn new(source_url: impl Into<String>, songs: Vec<CatalogEntry>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            source_url: source_url.into(),
            fetched_at: Utc::now(),
            songs,
        }
    }

    pub fn cache_path(dir: &Path) -> PathBuf {
        dir.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（存在しない・破損・バージョン不一致は None）
    pub fn load(dir: &Path) -> Option<Self> {
        let cache_path = Self::cache_path(dir);
        if !cache_path.exists() {
            return None;
        }

        let file = File::open(&cache_path).ok()?;
        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, CatalogCache>(reader) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => Some(cache),
            Ok(_) => {
                warn!("キャッシュバージョン不一致、再取得します");
                None
            }
            Err(e) => {
                warn!("キャッシュ読み込み失敗: {}", e);
                None
            }
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let file = File::create(Self::cache_path(dir))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（削除した場合 true）
    pub fn clear(dir: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(dir);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.is_stale_at(Utc::now(), max_age)
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.fetched_at > max_age
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn into_index(self) -> CatalogIndex {
        CatalogIndex::new(self.songs)
    }
}

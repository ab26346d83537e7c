//! 曲カタログのインデックス
//!
//! 取得済みの曲データ（譜面のフラットな配列）から、難易度・曲師での
//! 絞り込みを提供する。構築後は変更しないため、複数スレッドから共有できる。

use crate::error::{Error, Result};
use crate::types::CatalogEntry;
use std::collections::HashSet;

/// カタログの読み取り専用ビュー
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
}

impl CatalogIndex {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// JSON配列文字列から構築
    pub fn from_json(json: &str) -> Result<Self> {
        parse_entries(json).map(Self::new)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 指定難易度の譜面（大文字小文字を区別しない）
    pub fn entries_by_difficulty(&self, difficulty: &str) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| eq_ignore_case(&e.difficulty, difficulty))
            .collect()
    }

    /// 曲師の一覧（難易度で絞り込み可）
    ///
    /// 初出順で重複を除く。
    pub fn distinct_artists(&self, difficulty: Option<&str>) -> Vec<&str> {
        let entries = self
            .entries
            .iter()
            .filter(|e| difficulty.map_or(true, |d| eq_ignore_case(&e.difficulty, d)));
        distinct(entries.map(|e| e.artist.as_str()))
    }

    /// 難易度の一覧
    pub fn distinct_difficulties(&self) -> Vec<&str> {
        distinct(self.entries.iter().map(|e| e.difficulty.as_str()))
    }

    /// 指定曲師・指定難易度の譜面（カタログ順）
    pub fn entries_by_artist_and_difficulty(
        &self,
        artist: &str,
        difficulty: &str,
    ) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| {
                eq_ignore_case(&e.artist, artist) && eq_ignore_case(&e.difficulty, difficulty)
            })
            .collect()
    }

    /// 指定曲師の全譜面（難易度を問わない）
    pub fn entries_by_artist(&self, artist: &str) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| eq_ignore_case(&e.artist, artist))
            .collect()
    }
}

/// 曲データJSON（譜面の配列）をパースする
pub fn parse_entries(json: &str) -> Result<Vec<CatalogEntry>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(Error::Catalog("曲データがJSON配列ではありません".into()));
    }
    Ok(serde_json::from_value(value)?)
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .collect()
}

//! 照合結果の集約
//!
//! スクリーンショットごとの照合結果から、保存用レコードを作成する。
//! 未一致の結果は除外し、(曲名, 曲師, 難易度) の組で重複を除く（先勝ち）。

use crate::types::{OutputRecord, ScreenshotReport};
use std::collections::HashSet;

/// 保存用レコードの統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblySummary {
    pub records: usize,
    pub artists: usize,
    pub titles: usize,
    pub difficulties: usize,
}

/// 照合結果を保存用レコードに変換する
pub fn assemble(reports: &[ScreenshotReport]) -> Vec<OutputRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for report in reports {
        let Some(entry) = &report.result.entry else {
            continue;
        };

        let key = (entry.title.clone(), entry.artist.clone(), entry.difficulty.clone());
        if !seen.insert(key) {
            continue;
        }

        records.push(OutputRecord {
            title: entry.title.clone(),
            artist: entry.artist.clone(),
            difficulty: entry.difficulty.clone(),
            level: entry.level.as_f64(),
            score: report.observation.rating_text.clone(),
        });
    }

    records
}

/// 曲師・曲名・難易度の種類数を数える
pub fn summarize(records: &[OutputRecord]) -> AssemblySummary {
    let artists: HashSet<&str> = records.iter().map(|r| r.artist.as_str()).collect();
    let titles: HashSet<&str> = records.iter().map(|r| r.title.as_str()).collect();
    let difficulties: HashSet<&str> = records.iter().map(|r| r.difficulty.as_str()).collect();

    AssemblySummary {
        records: records.len(),
        artists: artists.len(),
        titles: titles.len(),
        difficulties: difficulties.len(),
    }
}

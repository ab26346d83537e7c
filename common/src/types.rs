//! 照合処理の型定義
//!
//! CLIとコアで共有される型:
//! - CatalogEntry: 曲カタログの1譜面
//! - OcrObservation: スクリーンショット1枚分のOCR結果
//! - MatchResult: カスケード照合の結果
//! - OutputRecord: 保存用の最終レコード

use serde::{Deserialize, Serialize};

/// 譜面レベル
///
/// カタログJSONは外部データなので、どんな値でも受け付ける。
/// 数値として読めない値は [`Level::as_f64`] で 0.0 になる。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    /// 真偽値・配列・オブジェクトなど
    Other(serde_json::Value),
}

impl Level {
    /// 数値に変換する（変換できない場合は 0.0）
    pub fn as_f64(&self) -> f64 {
        match self {
            Level::Number(n) if n.is_finite() => *n,
            Level::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl From<f64> for Level {
    fn from(value: f64) -> Self {
        Level::Number(value)
    }
}

/// カタログの1譜面（曲名・曲師・難易度の組で一意）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    pub title: String,
    pub artist: String,
    pub difficulty: String,
    pub level: Level,
}

impl CatalogEntry {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        difficulty: impl Into<String>,
        level: impl Into<Level>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            difficulty: difficulty.into(),
            level: level.into(),
        }
    }
}

/// スクリーンショット1枚分のOCR結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OcrObservation {
    pub song_text: String,
    pub artist_text: String,
    pub rating_text: String,
    /// ピクセル判定による難易度ラベル
    pub difficulty: String,
}

impl OcrObservation {
    pub fn new(
        song_text: impl Into<String>,
        artist_text: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Self {
        Self {
            song_text: song_text.into(),
            artist_text: artist_text.into(),
            difficulty: difficulty.into(),
            ..Default::default()
        }
    }

    pub fn with_rating(mut self, rating_text: impl Into<String>) -> Self {
        self.rating_text = rating_text.into();
        self
    }
}

/// 曲師がどの範囲で見つかったか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistScope {
    /// 一致した難易度の曲師の中で見つかった
    Scoped,
    /// 全曲師から見つかった（フォールバック）
    Unscoped,
}

/// 曲名がどの候補集合で見つかったか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleScope {
    ArtistAndDifficulty,
    ArtistOnly,
    DifficultyOnly,
}

/// 各段階の類似度（未一致の段階は 0）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageScores {
    pub difficulty: u8,
    pub artist: u8,
    pub title: u8,
}

impl StageScores {
    pub fn mean(&self) -> f64 {
        (self.difficulty as f64 + self.artist as f64 + self.title as f64) / 3.0
    }
}

/// カスケード照合の結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub difficulty: Option<String>,
    pub artist: Option<String>,
    pub entry: Option<CatalogEntry>,
    /// 総合類似度 (0-100)
    pub confidence: f64,
    pub scores: StageScores,
    pub artist_scope: Option<ArtistScope>,
    pub title_scope: Option<TitleScope>,
}

impl MatchResult {
    /// 何も一致しなかった結果
    pub fn unmatched() -> Self {
        Self::default()
    }

    pub fn is_matched(&self) -> bool {
        self.entry.is_some()
    }

    /// 曲師がフォールバックで見つかったか
    pub fn is_artist_fallback(&self) -> bool {
        self.artist_scope == Some(ArtistScope::Unscoped)
    }
}

/// スクリーンショット1枚の処理結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotReport {
    pub file_name: String,
    pub observation: OcrObservation,
    pub result: MatchResult,
}

/// 保存用の最終レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub title: String,
    pub artist: String,
    pub difficulty: String,
    pub level: f64,
    pub score: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_as_f64() {
        assert_eq!(Level::Number(10.5).as_f64(), 10.5);
        assert_eq!(Level::Text(" 12 ".into()).as_f64(), 12.0);
        assert_eq!(Level::Text("12+".into()).as_f64(), 0.0);
        assert_eq!(Level::Missing.as_f64(), 0.0);
        assert_eq!(Level::Other(serde_json::Value::Bool(true)).as_f64(), 0.0);
    }

    #[test]
    fn test_level_malformed_values_do_not_fail_catalog() {
        let json = r#"[
            {"title": "A", "artist": "X", "difficulty": "Massive", "level": true},
            {"title": "B", "artist": "X", "difficulty": "Massive", "level": {"v": 1}},
            {"title": "C", "artist": "X", "difficulty": "Massive", "level": [1, 2]},
            {"title": "D", "artist": "X", "difficulty": "Massive", "level": null},
            {"title": "E", "artist": "X", "difficulty": "Massive", "level": 12}
        ]"#;
        let entries: Vec<CatalogEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries.len(), 5);
        assert!(matches!(entries[0].level, Level::Other(_)));
        assert!(matches!(entries[1].level, Level::Other(_)));
        assert_eq!(entries[3].level, Level::Missing);
        let levels: Vec<f64> = entries.iter().map(|e| e.level.as_f64()).collect();
        assert_eq!(levels, vec![0.0, 0.0, 0.0, 0.0, 12.0]);
    }

    #[test]
    fn test_catalog_entry_lenient_level() {
        let json = r#"[
            {"title": "A", "artist": "X", "difficulty": "Massive", "level": 11.5},
            {"title": "B", "artist": "Y", "difficulty": "Invaded", "level": "9"},
            {"title": "C", "artist": "Z", "difficulty": "Detected", "level": null},
            {"title": "D", "artist": "W", "difficulty": "Detected"}
        ]"#;
        let entries: Vec<CatalogEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].level, Level::Number(11.5));
        assert_eq!(entries[1].level, Level::Text("9".into()));
        assert_eq!(entries[2].level, Level::Missing);
        assert_eq!(entries[3].level, Level::Missing);
    }

    #[test]
    fn test_observation_camel_case() {
        let obs = OcrObservation::new("Rocket Lancer", "Kobaryo", "Massive").with_rating("998765");
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["songText"], "Rocket Lancer");
        assert_eq!(json["ratingText"], "998765");
    }

    #[test]
    fn test_stage_scores_mean() {
        let scores = StageScores { difficulty: 100, artist: 0, title: 80 };
        assert!((scores.mean() - 60.0).abs() < 1e-9);
    }
}

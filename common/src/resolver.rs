//! カスケード照合
//!
//! 難易度 → 曲師 → 曲名 の順に候補を絞り込みながら照合する。
//! 信頼度の高い信号（ピクセル判定の難易度）から順に使い、各段階の
//! 探索範囲を小さく保つ。どの段階も失敗でエラーにはならず、結果の
//! 劣化として [`MatchResult`] に記録される。
//!
//! ## 処理フロー
//! 1. 難易度: カタログの全難易度と部分一致（失敗時は終了）
//! 2. 曲師: 難易度内の曲師 → 全曲師（フォールバック） → 曲師なしで続行
//! 3. 曲名: 曲師+難易度 → 曲師のみ → 難易度のみ（曲師なしの場合）
//! 4. 集計: 3段階のスコア平均

use crate::catalog::CatalogIndex;
use crate::similarity::{best_match, partial_score, score, ScoreFn};
use crate::types::{ArtistScope, CatalogEntry, MatchResult, OcrObservation, StageScores, TitleScope};
use tracing::debug;

/// 照合の閾値設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    pub difficulty_threshold: u8,
    pub artist_threshold: u8,
    pub title_threshold: u8,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            difficulty_threshold: 70,
            artist_threshold: 70,
            title_threshold: 70,
        }
    }
}

/// カタログに対するカスケード照合器
#[derive(Debug, Clone, Copy)]
pub struct CascadeResolver<'a> {
    index: &'a CatalogIndex,
    config: ResolverConfig,
    difficulty_scorer: ScoreFn,
    text_scorer: ScoreFn,
}

impl<'a> CascadeResolver<'a> {
    pub fn new(index: &'a CatalogIndex, config: ResolverConfig) -> Self {
        Self {
            index,
            config,
            difficulty_scorer: partial_score,
            text_scorer: score,
        }
    }

    /// 曲師・曲名の比較も部分一致のみで行う
    pub fn with_partial_scoring(mut self) -> Self {
        self.text_scorer = partial_score;
        self
    }

    /// OCR結果をカタログの1譜面に照合する
    pub fn resolve(&self, observation: &OcrObservation) -> MatchResult {
        // 1. 難易度
        let Some((difficulty, difficulty_score)) = self.match_difficulty(&observation.difficulty)
        else {
            debug!(difficulty = %observation.difficulty, "難易度が一致しないため照合を中止");
            return MatchResult::unmatched();
        };
        debug!(%difficulty, score = difficulty_score, "難易度一致");

        // 2. 曲師
        let artist = self.match_artist(&observation.artist_text, difficulty);
        match &artist {
            Some((name, artist_score, scope)) => {
                debug!(artist = %name, score = artist_score, ?scope, "曲師一致")
            }
            None => debug!(artist = %observation.artist_text, "曲師が一致しないため難易度のみで曲名を照合"),
        }

        let mut scores = StageScores {
            difficulty: difficulty_score,
            artist: artist.as_ref().map_or(0, |(_, s, _)| *s),
            title: 0,
        };
        let mut result = MatchResult {
            difficulty: Some(difficulty.to_string()),
            artist: artist.as_ref().map(|(name, _, _)| name.to_string()),
            artist_scope: artist.as_ref().map(|(_, _, scope)| *scope),
            ..Default::default()
        };

        // 3. 曲名
        let artist_name = artist.as_ref().map(|(name, _, _)| *name);
        let Some((entry, title_score, title_scope)) =
            self.match_title(&observation.song_text, artist_name, difficulty)
        else {
            debug!(song = %observation.song_text, "曲名が一致しない");
            result.scores = scores;
            return result;
        };
        debug!(title = %entry.title, score = title_score, ?title_scope, "曲名一致");

        // 4. 集計
        scores.title = title_score;
        result.entry = Some(entry.clone());
        result.title_scope = Some(title_scope);
        result.scores = scores;
        result.confidence = scores.mean();
        result
    }

    fn match_difficulty(&self, observed: &str) -> Option<(&'a str, u8)> {
        best_match(
            observed,
            self.index.distinct_difficulties(),
            self.config.difficulty_threshold,
            |d| *d,
            self.difficulty_scorer,
        )
    }

    fn match_artist(&self, observed: &str, difficulty: &str) -> Option<(&'a str, u8, ArtistScope)> {
        let threshold = self.config.artist_threshold;

        let scoped = best_match(
            observed,
            self.index.distinct_artists(Some(difficulty)),
            threshold,
            |a| *a,
            self.text_scorer,
        );
        if let Some((artist, artist_score)) = scoped {
            return Some((artist, artist_score, ArtistScope::Scoped));
        }

        debug!(%difficulty, "難易度内に曲師が見つからないため全曲師から照合");
        best_match(
            observed,
            self.index.distinct_artists(None),
            threshold,
            |a| *a,
            self.text_scorer,
        )
        .map(|(artist, artist_score)| (artist, artist_score, ArtistScope::Unscoped))
    }

    fn match_title(
        &self,
        observed: &str,
        artist: Option<&str>,
        difficulty: &str,
    ) -> Option<(&'a CatalogEntry, u8, TitleScope)> {
        let domains: Vec<(TitleScope, Vec<&'a CatalogEntry>)> = match artist {
            Some(artist) => vec![
                (
                    TitleScope::ArtistAndDifficulty,
                    self.index.entries_by_artist_and_difficulty(artist, difficulty),
                ),
                (TitleScope::ArtistOnly, self.index.entries_by_artist(artist)),
            ],
            None => vec![(
                TitleScope::DifficultyOnly,
                self.index.entries_by_difficulty(difficulty),
            )],
        };

        for (scope, candidates) in domains {
            if candidates.is_empty() {
                debug!(?scope, "候補なし");
                continue;
            }
            let found = best_match(
                observed,
                candidates,
                self.config.title_threshold,
                |e| e.title.as_str(),
                self.text_scorer,
            );
            if let Some((entry, title_score)) = found {
                return Some((entry, title_score, scope));
            }
        }
        None
    }
}

/// 既定の閾値で照合する
pub fn resolve(observation: &OcrObservation, index: &CatalogIndex) -> MatchResult {
    CascadeResolver::new(index, ResolverConfig::default()).resolve(observation)
}

//! 文字列類似度スコア
//!
//! OCRは文字の欠けや切れが多いため、部分一致を中心に複数の指標を計算し、
//! 最も高い値を採用する。スコアはすべて 0-100 の整数。

use crate::normalize::normalize;
use strsim::normalized_levenshtein;

/// 類似度関数の型
pub type ScoreFn = fn(&str, &str) -> u8;

/// 部分一致・語順無視・全体一致の最大値
///
/// どちらかが正規化後に空文字なら 0。
pub fn score(query: &str, candidate: &str) -> u8 {
    let query = normalize(query);
    let candidate = normalize(candidate);
    if query.is_empty() || candidate.is_empty() {
        return 0;
    }

    partial_ratio(&query, &candidate)
        .max(token_sort_ratio(&query, &candidate))
        .max(ratio(&query, &candidate))
}

/// 部分一致のみのスコア
pub fn partial_score(query: &str, candidate: &str) -> u8 {
    let query = normalize(query);
    let candidate = normalize(candidate);
    if query.is_empty() || candidate.is_empty() {
        return 0;
    }

    partial_ratio(&query, &candidate)
}

/// 文字列全体の編集距離による類似度
pub fn ratio(a: &str, b: &str) -> u8 {
    to_percent(normalized_levenshtein(a, b))
}

/// 短い方の文字列を長い方の各位置に重ねたときの最大類似度
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    if shorter.is_empty() {
        return 0;
    }
    if shorter.len() == longer.len() {
        return ratio(a, b);
    }

    let needle: String = shorter.iter().collect();
    let mut best = 0;
    for window in longer.windows(shorter.len()) {
        let window: String = window.iter().collect();
        best = best.max(ratio(&needle, &window));
        if best == 100 {
            break;
        }
    }
    best
}

/// 単語を並べ替えてから比較する類似度
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sort_tokens(a), &sort_tokens(b))
}

fn sort_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn to_percent(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

/// 閾値以上で最もスコアの高い候補を返す
///
/// 同点の場合は先に出現した候補を優先する。
/// 問い合わせが正規化後に空文字の場合は照合しない。
pub fn best_match<I, T, K, F>(
    query: &str,
    candidates: I,
    threshold: u8,
    key: K,
    scorer: F,
) -> Option<(T, u8)>
where
    I: IntoIterator<Item = T>,
    K: Fn(&T) -> &str,
    F: Fn(&str, &str) -> u8,
{
    if normalize(query).is_empty() {
        return None;
    }

    let mut best: Option<(T, u8)> = None;
    for candidate in candidates {
        let value = scorer(query, key(&candidate));
        if value == 0 || value < threshold {
            continue;
        }
        if best.as_ref().map_or(true, |(_, best_score)| value > *best_score) {
            best = Some((candidate, value));
        }
    }
    best
}

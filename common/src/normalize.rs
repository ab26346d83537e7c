//! OCR文字列の正規化

/// 比較用に正規化する
///
/// 小文字化し、英数字・空白以外を除去して前後の空白を削る。
/// 結果が空文字の場合は「信号なし」として扱うこと。
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// OCR生テキストの前処理（区切り記号の除去）
pub fn clean_ocr_text(text: &str) -> String {
    text.replace(['/', '、', ','], "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  Rocket Lancer! "), "rocket lancer");
        assert_eq!(normalize("Ko-ba_ryo"), "kobaryo");
        assert_eq!(normalize("曲名：テスト"), "曲名テスト");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
        assert_eq!(normalize("!?/・"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "Rocket Lancer",
            "  MiXeD  CaSe  ",
            "İstanbul",
            "(feat. Someone) - Remix!!",
            "ＦＵＬＬ　ＷＩＤＴＨ",
            "",
            " ! ",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_clean_ocr_text() {
        assert_eq!(clean_ocr_text(" 1,009,876 "), "1009876");
        assert_eq!(clean_ocr_text("A/B、C"), "ABC");
    }
}

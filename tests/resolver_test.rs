//! カスケード照合テスト
//!
//! 難易度 → 曲師 → 曲名 の照合とフォールバックを検証

use rhythm_ocr_core::{
    normalize, resolve, score, ArtistScope, CascadeResolver, CatalogEntry, CatalogIndex,
    MatchResult, OcrObservation, ResolverConfig, TitleScope,
};

fn three_difficulty_catalog() -> CatalogIndex {
    CatalogIndex::new(vec![
        CatalogEntry::new("Rocket Lancer", "Kobaryo", "Massive", 10.0),
        CatalogEntry::new("Glass Tower", "Sakura", "Invaded", 7.0),
        CatalogEntry::new("Paper Moon", "Tanaka", "Detected", 4.0),
    ])
}

/// シナリオA: 曲名の1文字誤認識でも一致する
#[test]
fn test_scenario_single_typo_in_title() {
    let index = CatalogIndex::new(vec![CatalogEntry::new(
        "Rocket Lancer",
        "Kobaryo",
        "Massive",
        10.0,
    )]);
    let obs = OcrObservation::new("Rocket Lanter", "Kobaryo", "Massive");

    let result = resolve(&obs, &index);
    let entry = result.entry.clone().expect("一致するはず");
    assert_eq!(entry.title, "Rocket Lancer");
    assert_eq!(entry.artist, "Kobaryo");
    assert!(result.confidence > 70.0, "confidence: {}", result.confidence);
}

/// シナリオB: 難易度が一致しなければ何も返さない
#[test]
fn test_scenario_unknown_difficulty() {
    let index = three_difficulty_catalog();
    let obs = OcrObservation::new("Rocket Lancer", "Kobaryo", "Zzzznonsense");

    let result = resolve(&obs, &index);
    assert!(result.entry.is_none());
    assert_eq!(result.confidence, 0.0);
    assert!(result.difficulty.is_none());
}

/// 難易度失敗時は曲師・曲名の入力に関わらず未一致
#[test]
fn test_difficulty_failure_ignores_other_fields() {
    let index = three_difficulty_catalog();
    let inputs = [
        ("Rocket Lancer", "Kobaryo"),
        ("Glass Tower", "Sakura"),
        ("", ""),
        ("Paper Moon", "Unknown Artist"),
    ];
    for (song, artist) in inputs {
        let result = resolve(&OcrObservation::new(song, artist, "Qwxyz"), &index);
        assert_eq!(result, MatchResult::unmatched());
    }
}

/// シナリオC: 難易度内にいない曲師は全曲師から見つけて続行する
#[test]
fn test_scenario_artist_fallback() {
    let index = CatalogIndex::new(vec![
        CatalogEntry::new("Rocket Lancer", "Kobaryo", "Massive", 10.0),
        CatalogEntry::new("Glass Tower", "Sakura", "Invaded", 7.0),
    ]);
    // Sakura は Invaded にしか譜面がない
    let obs = OcrObservation::new("Glass Tower", "Sakura", "Massive");

    let result = resolve(&obs, &index);
    assert_eq!(result.artist_scope, Some(ArtistScope::Unscoped));
    assert_eq!(result.artist.as_deref(), Some("Sakura"));
    assert_eq!(result.title_scope, Some(TitleScope::ArtistOnly));
    assert!(result.scores.artist > 0);
    assert_eq!(result.confidence, result.scores.mean());
    assert_eq!(result.entry.unwrap().title, "Glass Tower");
}

/// 曲師+難易度に候補はあるが曲名が一致しない場合は曲師の全譜面に広げる
#[test]
fn test_title_widens_to_artist_when_scoped_titles_miss() {
    let index = CatalogIndex::new(vec![
        CatalogEntry::new("Alpha Song", "Kobaryo", "Massive", 9.0),
        CatalogEntry::new("Rocket Lancer", "Kobaryo", "Invaded", 7.0),
    ]);
    let obs = OcrObservation::new("Rocket Lanter", "Kobaryo", "Massive");

    let result = resolve(&obs, &index);
    assert_eq!(result.difficulty.as_deref(), Some("Massive"));
    assert_eq!(result.artist_scope, Some(ArtistScope::Scoped));
    assert_eq!(result.title_scope, Some(TitleScope::ArtistOnly));

    let entry = result.entry.clone().expect("曲師の全譜面から一致するはず");
    assert_eq!(entry.title, "Rocket Lancer");
    assert_eq!(entry.difficulty, "Invaded");
    assert_ne!(Some(entry.difficulty.as_str()), result.difficulty.as_deref());

    let scores = result.scores;
    assert_eq!(scores.difficulty, 100);
    assert_eq!(scores.artist, 100);
    assert_eq!(scores.title, score("Rocket Lanter", "Rocket Lancer"));
    let expected = (scores.difficulty as f64 + scores.artist as f64 + scores.title as f64) / 3.0;
    assert!((result.confidence - expected).abs() < 1e-9);
}

/// 曲師が全く一致しない場合は難易度内の全曲から曲名を探す
#[test]
fn test_difficulty_only_title_fallback() {
    let index = three_difficulty_catalog();
    let obs = OcrObservation::new("Glass Tower", "Qqqqqq", "Invaded");

    let result = resolve(&obs, &index);
    assert!(result.artist.is_none());
    assert_eq!(result.title_scope, Some(TitleScope::DifficultyOnly));
    assert_eq!(result.scores.artist, 0);
    assert!(result.confidence > 0.0);
    assert_eq!(result.entry.unwrap().difficulty, "Invaded");
}

/// 曲名が曲師+難易度の範囲で一致した場合、譜面の難易度は一致した難易度
#[test]
fn test_doubly_scoped_entry_difficulty_consistent() {
    let index = CatalogIndex::new(vec![
        CatalogEntry::new("Rocket Lancer", "Kobaryo", "Massive", 10.0),
        CatalogEntry::new("Rocket Lancer", "Kobaryo", "Invaded", 7.0),
        CatalogEntry::new("Rocket Lancer", "Kobaryo", "Detected", 3.0),
    ]);
    for difficulty in ["Massive", "Invaded", "Detected"] {
        let result = resolve(&OcrObservation::new("Rocket Lancer", "Kobaryo", difficulty), &index);
        assert_eq!(result.title_scope, Some(TitleScope::ArtistAndDifficulty));
        let entry = result.entry.unwrap();
        assert_eq!(entry.difficulty, difficulty);
        assert!(entry.level.as_f64() > 0.0);
    }
}

/// 閾値ちょうどは採用、1つ下は不採用
#[test]
fn test_threshold_boundary_inclusive() {
    let index = CatalogIndex::new(vec![CatalogEntry::new(
        "Rocket Lancer",
        "Kobaryo",
        "Massive",
        10.0,
    )]);
    let obs = OcrObservation::new("Rocket Lanter", "Kobaryo", "Massive");
    let title_score = score("Rocket Lanter", "Rocket Lancer");

    let at = ResolverConfig { title_threshold: title_score, ..Default::default() };
    assert!(CascadeResolver::new(&index, at).resolve(&obs).entry.is_some());

    let above = ResolverConfig { title_threshold: title_score + 1, ..Default::default() };
    assert!(CascadeResolver::new(&index, above).resolve(&obs).entry.is_none());
}

/// 一致ありなら信頼度 > 0、一致なしなら 0
#[test]
fn test_confidence_invariant() {
    let index = three_difficulty_catalog();
    let observations = [
        OcrObservation::new("Rocket Lancer", "Kobaryo", "Massive"),
        OcrObservation::new("Nothing Like It", "Kobaryo", "Massive"),
        OcrObservation::new("Paper Moo", "", "Detected"),
        OcrObservation::new("", "", ""),
    ];
    for obs in observations {
        let result = resolve(&obs, &index);
        if result.entry.is_some() {
            assert!(result.confidence > 0.0);
            assert!(result.confidence <= 100.0);
        } else {
            assert_eq!(result.confidence, 0.0);
        }
    }
}

/// 正規化は冪等
#[test]
fn test_normalize_idempotent_property() {
    let samples = [
        "Rocket Lancer",
        "  ROCKET__LANCER!! ",
        "曲名 / 曲師、テスト",
        "\t\n",
        "Ça va? Très bien.",
        "1,009,876",
    ];
    for s in samples {
        let once = normalize(s);
        assert_eq!(normalize(&once), once);
    }
}

/// スコアは常に 0-100、空文字は 0
#[test]
fn test_score_bounds_property() {
    let samples = ["", " ", "a", "Rocket Lancer", "rocket", "ケセラセラ", "Zzzznonsense"];
    for q in samples {
        for c in samples {
            let value = score(q, c);
            assert!(value <= 100);
            if normalize(q).is_empty() || normalize(c).is_empty() {
                assert_eq!(value, 0, "q={:?} c={:?}", q, c);
            }
        }
    }
}

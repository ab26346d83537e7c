use clap::Parser;
use rhythm_ocr::{catalog, cli, config, error, ocr, pipeline, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::{RhythmOcrError, Result};
use rhythm_ocr_core::{assemble, summarize, CascadeResolver, CatalogIndex, OcrObservation};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    // config サブコマンドは設定ファイルが壊れていても実行できる
    let config = match &cli.command {
        Commands::Config { .. } => Config::load_or_default()?,
        _ => Config::load()?,
    };

    match cli.command {
        Commands::Run { folder, output, catalog, refresh, report, thresholds } => {
            println!("🎵 rhythm-ocr - リザルト読み取り\n");

            // 1. スクリーンショットスキャン
            println!("[1/4] スクリーンショットをスキャン中...");
            let screenshots = scanner::scan_folder(&folder)?;
            println!("✔ {}枚のスクリーンショットを検出\n", screenshots.len());

            if screenshots.is_empty() {
                return Err(RhythmOcrError::NoScreenshotsFound(folder.display().to_string()));
            }

            // 2. 曲データ読み込み
            println!("[2/4] 曲データを読み込み中...");
            let index = load_catalog(&config, catalog.as_deref(), refresh).await?;
            println!("✔ {}譜面\n", index.len());

            // 3. OCR・照合
            println!("[3/4] OCR・照合中...");
            let resolver = CascadeResolver::new(&index, thresholds.apply(config.resolver_config()));
            let recognizer = ocr::CommandRecognizer::from_config(&config);
            let runner = pipeline::Pipeline::new(resolver, &config.screen, &recognizer);
            let outcome = runner.process_all(&screenshots, !cli.verbose);
            println!(
                "✔ 照合成功 {}/{}枚（失敗 {}枚）\n",
                outcome.matched_count(),
                outcome.reports.len(),
                outcome.failures.len()
            );
            for failure in &outcome.failures {
                println!("  ⚠ {}: {}", failure.file_name, failure.error);
            }

            // 4. 結果保存
            println!("[4/4] 結果を保存中...");
            let records = assemble(&outcome.reports);
            pipeline::write_records(&output, &records)?;
            println!("✔ 結果を保存: {}", output.display());

            if let Some(report_path) = report {
                pipeline::write_reports(&report_path, &outcome.reports)?;
                println!("✔ 詳細結果を保存: {}", report_path.display());
            }

            let summary = summarize(&records);
            println!(
                "\n✅ 完了: {}件（曲師 {}、曲 {}、難易度 {}）",
                summary.records, summary.artists, summary.titles, summary.difficulties
            );
        }

        Commands::Resolve { song, artist, difficulty, catalog, thresholds } => {
            let index = load_catalog(&config, catalog.as_deref(), false).await?;
            let resolver = CascadeResolver::new(&index, thresholds.apply(config.resolver_config()));
            let result = resolver.resolve(&OcrObservation::new(song, artist, difficulty));

            println!("難易度: {}", result.difficulty.as_deref().unwrap_or("-"));
            println!(
                "曲師: {}{}",
                result.artist.as_deref().unwrap_or("-"),
                if result.is_artist_fallback() { "（全曲師から一致）" } else { "" }
            );
            match &result.entry {
                Some(entry) => {
                    println!("\n✅ 一致 (総合類似度: {:.1}%)", result.confidence);
                    println!("  曲名: {}", entry.title);
                    println!("  曲師: {}", entry.artist);
                    println!("  難易度: {}", entry.difficulty);
                    println!("  レベル: {}", entry.level.as_f64());
                }
                None => println!("\n❌ 一致する譜面がありません"),
            }
        }

        Commands::Catalog { refresh, clear, info } => {
            let cache_dir = Config::cache_dir()?;
            let cache_path = catalog::CatalogCache::cache_path(&cache_dir);

            if clear {
                match catalog::CatalogCache::clear(&cache_dir) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }

            if refresh {
                let options = catalog::CatalogOptions::from_config(&config, true)?;
                let (index, source) = catalog::load_or_fetch(&options).await?;
                println!("✔ 曲データ {}譜面 ({})", index.len(), source);
            }

            if info || (!clear && !refresh) {
                match catalog::CatalogCache::load(&cache_dir) {
                    Some(cache) => {
                        println!("キャッシュ情報:");
                        println!("  パス: {}", cache_path.display());
                        println!("  取得元: {}", cache.source_url());
                        println!("  取得日時: {}", cache.fetched_at().format("%Y-%m-%d %H:%M:%S UTC"));
                        println!("  譜面数: {}", cache.len());
                    }
                    None => println!("キャッシュファイルが存在しません: {}", cache_path.display()),
                }
            }
        }

        Commands::Config { set_catalog_url, set_ocr_command, show } => {
            let mut config = config;

            if let Some(url) = set_catalog_url {
                config.set_catalog_url(url)?;
                println!("✔ 曲データURLを設定しました");
            }

            if let Some(command) = set_ocr_command {
                config.set_ocr_command(command)?;
                println!("✔ OCRコマンドを設定しました");
            }

            if show {
                println!("設定:");
                println!("  曲データURL: {}", config.catalog_url());
                println!("  キャッシュ有効期間: {}時間", config.catalog_max_age_hours);
                println!(
                    "  閾値: 難易度 {} / 曲師 {} / 曲名 {}",
                    config.difficulty_threshold, config.artist_threshold, config.title_threshold
                );
                println!("  OCRコマンド: {} {}", config.ocr_command, config.ocr_args.join(" "));
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn load_catalog(config: &Config, file: Option<&Path>, refresh: bool) -> Result<CatalogIndex> {
    let (index, source) = match file {
        Some(path) => (catalog::load_catalog_file(path)?, catalog::CatalogSource::File),
        None => {
            let options = catalog::CatalogOptions::from_config(config, refresh)?;
            catalog::load_or_fetch(&options).await?
        }
    };
    tracing::info!(%source, songs = index.len(), "曲データ読み込み");

    if index.is_empty() {
        return Err(RhythmOcrError::CatalogUnavailable);
    }
    Ok(index)
}

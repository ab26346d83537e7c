//! スクリーンショット一括処理
//!
//! 1枚ずつ 画面判定 → OCR → カタログ照合 を行い、結果を集約して保存する。
//! 1枚の失敗（画像読み込み・OCR）はその画像をスキップして続行する。

use crate::error::{RhythmOcrError, Result};
use crate::ocr::{read_observation, TextRecognizer};
use crate::scanner::ScreenshotInfo;
use crate::screen::{classify, ScreenConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rhythm_ocr_core::{CascadeResolver, OutputRecord, ScreenshotReport};
use std::path::Path;
use tracing::{info, warn};

/// 処理に失敗したスクリーンショット
#[derive(Debug)]
pub struct ScreenshotFailure {
    pub file_name: String,
    pub error: RhythmOcrError,
}

/// 一括処理の結果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub reports: Vec<ScreenshotReport>,
    pub failures: Vec<ScreenshotFailure>,
}

impl BatchOutcome {
    pub fn matched_count(&self) -> usize {
        self.reports.iter().filter(|r| r.result.is_matched()).count()
    }
}

pub struct Pipeline<'a> {
    resolver: CascadeResolver<'a>,
    screen: &'a ScreenConfig,
    recognizer: &'a dyn TextRecognizer,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        resolver: CascadeResolver<'a>,
        screen: &'a ScreenConfig,
        recognizer: &'a dyn TextRecognizer,
    ) -> Self {
        Self { resolver, screen, recognizer }
    }

    /// スクリーンショット1枚を処理
    pub fn process_screenshot(&self, screenshot: &ScreenshotInfo) -> Result<ScreenshotReport> {
        let image = image::open(&screenshot.path)
            .map_err(|e| RhythmOcrError::ImageLoad(format!("{}: {}", screenshot.file_name, e)))?;

        let classification = classify(&image.to_rgb8(), self.screen);
        let profile = self.screen.profile(classification.layout);
        let observation = read_observation(
            &image,
            &profile.regions,
            classification.difficulty,
            self.recognizer,
        )?;

        let result = self.resolver.resolve(&observation);
        match &result.entry {
            Some(entry) => info!(
                file = %screenshot.file_name,
                layout = %classification.layout,
                title = %entry.title,
                artist = %entry.artist,
                difficulty = %entry.difficulty,
                confidence = result.confidence,
                "照合成功"
            ),
            None => info!(
                file = %screenshot.file_name,
                layout = %classification.layout,
                song = %observation.song_text,
                artist = %observation.artist_text,
                difficulty = %observation.difficulty,
                "照合失敗"
            ),
        }

        Ok(ScreenshotReport {
            file_name: screenshot.file_name.clone(),
            observation,
            result,
        })
    }

    /// 全スクリーンショットを順に処理
    pub fn process_all(&self, screenshots: &[ScreenshotInfo], show_progress: bool) -> BatchOutcome {
        let progress = if show_progress {
            let bar = ProgressBar::new(screenshots.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("  {bar:40} {pos}/{len} {msg}") {
                bar.set_style(style);
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut outcome = BatchOutcome::default();
        for screenshot in screenshots {
            progress.set_message(screenshot.file_name.clone());
            match self.process_screenshot(screenshot) {
                Ok(report) => outcome.reports.push(report),
                Err(error) => {
                    warn!(file = %screenshot.file_name, "処理失敗: {}", error);
                    outcome.failures.push(ScreenshotFailure {
                        file_name: screenshot.file_name.clone(),
                        error,
                    });
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        outcome
    }
}

/// 保存用レコードをJSON配列で書き出す
pub fn write_records(path: &Path, records: &[OutputRecord]) -> Result<()> {
    write_json(path, records)
}

/// スクリーンショットごとの詳細結果を書き出す
pub fn write_reports(path: &Path, reports: &[ScreenshotReport]) -> Result<()> {
    write_json(path, reports)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

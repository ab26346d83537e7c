//! 外部OCRコマンド連携モジュール
//!
//! 切り出した画像を一時PNGに書き出し、設定されたOCRコマンドに渡して
//! 標準出力の各行を認識結果とする。

use super::TextRecognizer;
use crate::config::Config;
use crate::error::{RhythmOcrError, Result};
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use std::process::Command;
use tracing::debug;

const INPUT_PLACEHOLDER: &str = "{input}";

/// 外部コマンドによるOCR
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ocr_command.clone(), config.ocr_args.clone())
    }

    /// 引数の `{input}` を画像パスに置換（プレースホルダーがなければ末尾に追加）
    fn build_args(&self, input: &Path) -> Vec<String> {
        let input = input.display().to_string();
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace(INPUT_PLACEHOLDER, &input))
            .collect();
        if !self.args.iter().any(|arg| arg.contains(INPUT_PLACEHOLDER)) {
            args.push(input);
        }
        args
    }
}

impl TextRecognizer for CommandRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<String>> {
        let temp = tempfile::Builder::new()
            .prefix("rhythm-ocr-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(temp.path(), ImageFormat::Png)?;

        let args = self.build_args(temp.path());
        debug!(program = %self.program, ?args, "OCRコマンド実行");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| RhythmOcrError::OcrExecution(format!("{} の実行に失敗: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RhythmOcrError::OcrExecution(format!(
                "{} failed (code {:?}): {}",
                self.program,
                output.status.code(),
                stderr
            )));
        }

        Ok(parse_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn parse_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_args_placeholder() {
        let recognizer = CommandRecognizer::new(
            "tesseract",
            vec!["{input}".into(), "stdout".into(), "--psm".into(), "7".into()],
        );
        let args = recognizer.build_args(&PathBuf::from("/tmp/crop.png"));
        assert_eq!(args, vec!["/tmp/crop.png", "stdout", "--psm", "7"]);
    }

    #[test]
    fn test_build_args_appends_input() {
        let recognizer = CommandRecognizer::new("rapidocr", vec!["--rec-only".into()]);
        let args = recognizer.build_args(&PathBuf::from("/tmp/crop.png"));
        assert_eq!(args, vec!["--rec-only", "/tmp/crop.png"]);
    }

    #[test]
    fn test_parse_lines() {
        let lines = parse_lines("Rocket Lancer\n\n  Kobaryo  \r\n");
        assert_eq!(lines, vec!["Rocket Lancer", "Kobaryo"]);
    }

    #[test]
    fn test_missing_command() {
        let recognizer = CommandRecognizer::new("rhythm-ocr-nonexistent-command", Vec::new());
        let image = DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
        let result = recognizer.recognize(&image);
        assert!(matches!(result, Err(RhythmOcrError::OcrExecution(_))));
    }
}

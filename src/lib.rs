//! リズムゲームのリザルト画面OCR・曲カタログ照合
//!
//! 照合エンジン本体は rhythm_ocr_core にあり、このクレートは
//! 画像・OCR・曲データ取得などのI/Oを担当する。

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod ocr;
pub mod pipeline;
pub mod scanner;
pub mod screen;

//! Rhythm OCR Core Library
//!
//! リザルト画面のOCR結果を曲カタログに照合するエンジン。
//! 画像・OCR・ネットワークなどのI/Oは持たない。

pub mod assembler;
pub mod catalog;
pub mod error;
pub mod normalize;
pub mod resolver;
pub mod similarity;
pub mod types;

pub use assembler::{assemble, summarize, AssemblySummary};
pub use catalog::{parse_entries, CatalogIndex};
pub use error::{Error, Result};
pub use normalize::{clean_ocr_text, normalize};
pub use resolver::{resolve, CascadeResolver, ResolverConfig};
pub use similarity::{best_match, partial_score, score};
pub use types::{
    ArtistScope, CatalogEntry, Level, MatchResult, OcrObservation, OutputRecord,
    ScreenshotReport, StageScores, TitleScope,
};

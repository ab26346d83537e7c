mod command;

pub use command::CommandRecognizer;

use crate::error::Result;
use crate::screen::{Difficulty, LayoutRegions};
use image::DynamicImage;
use regex::Regex;
use rhythm_ocr_core::{clean_ocr_text, OcrObservation};

/// 画像からテキスト行を認識する
pub trait TextRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<String>>;
}

/// 3領域をOCRして観測結果を作成する
///
/// 各領域は最初の認識行のみを使う。認識できなかった領域は空文字。
pub fn read_observation(
    image: &DynamicImage,
    regions: &LayoutRegions,
    difficulty: Difficulty,
    recognizer: &dyn TextRecognizer,
) -> Result<OcrObservation> {
    let song = read_region_text(image, &regions.song, recognizer)?;
    let artist = read_region_text(image, &regions.artist, recognizer)?;
    let rating = read_region_text(image, &regions.rating, recognizer)?;

    Ok(OcrObservation {
        song_text: song,
        artist_text: artist,
        rating_text: extract_score(&rating),
        difficulty: difficulty.to_string(),
    })
}

fn read_region_text(
    image: &DynamicImage,
    region: &crate::screen::Region,
    recognizer: &dyn TextRecognizer,
) -> Result<String> {
    let cropped = region.crop(image)?;
    let lines = recognizer.recognize(&cropped)?;
    Ok(lines
        .first()
        .map(|line| clean_ocr_text(line))
        .unwrap_or_default())
}

/// スコア表記から数字列を取り出す（最長の数字列、なければそのまま）
pub fn extract_score(text: &str) -> String {
    lazy_static::lazy_static! {
        static ref DIGITS_RE: Regex = Regex::new(r"\d+").unwrap();
    }

    let cleaned = clean_ocr_text(text).replace(['.', ' ', '\''], "");
    DIGITS_RE
        .find_iter(&cleaned)
        .map(|m| m.as_str())
        .max_by_key(|digits| digits.len())
        .map(str::to_string)
        .unwrap_or(cleaned)
}

//! リザルト画面の判定
//!
//! 指定座標のピクセル色から画面レイアウト（A/B）と難易度を判定し、
//! レイアウトごとのOCR領域を提供する。座標と色範囲はすべて
//! [`ScreenConfig`] で与える。

use crate::error::{RhythmOcrError, Result};
use image::{DynamicImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// 画面レイアウト
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    A,
    B,
}

impl LayoutKind {
    /// マーカー座標の色でレイアウトを判定（範囲外の座標は A）
    pub fn classify(image: &RgbImage, config: &ScreenConfig) -> Self {
        match sample(image, config.marker) {
            Some(pixel) if config.layout_b_marker.contains(pixel) => LayoutKind::B,
            _ => LayoutKind::A,
        }
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutKind::A => write!(f, "A"),
            LayoutKind::B => write!(f, "B"),
        }
    }
}

/// 難易度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Massive,
    Invaded,
    Detected,
}

impl Difficulty {
    /// 判定座標の色で難易度を判定（どの範囲にも入らなければ Detected）
    pub fn classify(image: &RgbImage, probe: &DifficultyProbe) -> Self {
        match sample(image, probe.point) {
            Some(pixel) if probe.massive.contains(pixel) => Difficulty::Massive,
            Some(pixel) if probe.invaded.contains(pixel) => Difficulty::Invaded,
            _ => Difficulty::Detected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Massive => "Massive",
            Difficulty::Invaded => "Invaded",
            Difficulty::Detected => "Detected",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RGBそれぞれの許容範囲（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbRange {
    pub r: (u8, u8),
    pub g: (u8, u8),
    pub b: (u8, u8),
}

impl RgbRange {
    pub const fn new(r: (u8, u8), g: (u8, u8), b: (u8, u8)) -> Self {
        Self { r, g, b }
    }

    pub fn contains(&self, pixel: &Rgb<u8>) -> bool {
        let [r, g, b] = pixel.0;
        (self.r.0..=self.r.1).contains(&r)
            && (self.g.0..=self.g.1).contains(&g)
            && (self.b.0..=self.b.1).contains(&b)
    }
}

/// 矩形領域（左上 x1,y1 から右下 x2,y2 の手前まで）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Region {
    pub const fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// 画像から領域を切り出す
    pub fn crop(&self, image: &DynamicImage) -> Result<DynamicImage> {
        if self.width() == 0
            || self.height() == 0
            || self.x2 > image.width()
            || self.y2 > image.height()
        {
            return Err(RhythmOcrError::RegionOutOfBounds(format!(
                "{:?} (画像サイズ {}x{})",
                self,
                image.width(),
                image.height()
            )));
        }
        Ok(image.crop_imm(self.x1, self.y1, self.width(), self.height()))
    }
}

/// OCR対象の3領域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRegions {
    pub song: Region,
    pub artist: Region,
    pub rating: Region,
}

/// 難易度判定の座標と色範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyProbe {
    pub point: (u32, u32),
    pub massive: RgbRange,
    pub invaded: RgbRange,
}

/// レイアウトごとの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutProfile {
    pub regions: LayoutRegions,
    pub difficulty: DifficultyProbe,
}

/// 画面判定の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// レイアウト判定の座標
    pub marker: (u32, u32),
    /// この色ならレイアウトB
    pub layout_b_marker: RgbRange,
    pub layout_a: LayoutProfile,
    pub layout_b: LayoutProfile,
}

impl ScreenConfig {
    pub fn profile(&self, kind: LayoutKind) -> &LayoutProfile {
        match kind {
            LayoutKind::A => &self.layout_a,
            LayoutKind::B => &self.layout_b,
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            marker: (27, 1934),
            layout_b_marker: RgbRange::new((60, 66), (136, 142), (170, 176)),
            layout_a: LayoutProfile {
                regions: LayoutRegions {
                    song: Region::new(935, 266, 2272, 346),
                    artist: Region::new(1000, 351, 2200, 425),
                    rating: Region::new(559, 1180, 1319, 1323),
                },
                difficulty: DifficultyProbe {
                    point: (1590, 441),
                    massive: RgbRange::new((210, 225), (135, 150), (235, 255)),
                    invaded: RgbRange::new((225, 238), (108, 120), (105, 120)),
                },
            },
            layout_b: LayoutProfile {
                regions: LayoutRegions {
                    song: Region::new(1603, 454, 3016, 535),
                    artist: Region::new(1681, 555, 3018, 624),
                    rating: Region::new(1946, 1485, 2420, 1596),
                },
                difficulty: DifficultyProbe {
                    point: (2982, 1520),
                    massive: RgbRange::new((170, 190), (120, 135), (200, 215)),
                    invaded: RgbRange::new((195, 210), (110, 120), (105, 120)),
                },
            },
        }
    }
}

/// スクリーンショット1枚の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenClassification {
    pub layout: LayoutKind,
    pub difficulty: Difficulty,
}

/// レイアウトと難易度をまとめて判定
pub fn classify(image: &RgbImage, config: &ScreenConfig) -> ScreenClassification {
    let layout = LayoutKind::classify(image, config);
    let difficulty = Difficulty::classify(image, &config.profile(layout).difficulty);
    ScreenClassification { layout, difficulty }
}

fn sample(image: &RgbImage, (x, y): (u32, u32)) -> Option<&Rgb<u8>> {
    if x < image.width() && y < image.height() {
        Some(image.get_pixel(x, y))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_range_inclusive() {
        let range = RgbRange::new((60, 66), (136, 142), (170, 176));
        assert!(range.contains(&Rgb([60, 136, 170])));
        assert!(range.contains(&Rgb([66, 142, 176])));
        assert!(!range.contains(&Rgb([67, 140, 172])));
    }

    #[test]
    fn test_region_crop() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(100, 50));
        let cropped = Region::new(10, 5, 40, 25).crop(&image).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (30, 20));
    }

    #[test]
    fn test_region_out_of_bounds() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(100, 50));
        assert!(Region::new(10, 5, 140, 25).crop(&image).is_err());
        assert!(Region::new(10, 5, 10, 25).crop(&image).is_err());
    }

    #[test]
    fn test_small_image_defaults() {
        // 座標が範囲外ならレイアウトA・Detected
        let image = RgbImage::new(10, 10);
        let result = classify(&image, &ScreenConfig::default());
        assert_eq!(result.layout, LayoutKind::A);
        assert_eq!(result.difficulty, Difficulty::Detected);
    }
}

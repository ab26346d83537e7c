use thiserror::Error;

#[derive(Error, Debug)]
pub enum RhythmOcrError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("スクリーンショットが見つかりません: {0}")]
    NoScreenshotsFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("領域が画像の範囲外です: {0}")]
    RegionOutOfBounds(String),

    #[error("OCR実行エラー: {0}")]
    OcrExecution(String),

    #[error("曲データ取得エラー: {0}")]
    CatalogFetch(String),

    #[error("曲データがありません。`rhythm-ocr catalog --refresh` で取得してください")]
    CatalogUnavailable,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] rhythm_ocr_core::Error),
}

impl From<reqwest::Error> for RhythmOcrError {
    fn from(e: reqwest::Error) -> Self {
        RhythmOcrError::CatalogFetch(e.to_string())
    }
}

impl From<image::ImageError> for RhythmOcrError {
    fn from(e: image::ImageError) -> Self {
        RhythmOcrError::ImageLoad(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RhythmOcrError>;

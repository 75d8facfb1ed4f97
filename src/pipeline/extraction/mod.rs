pub mod baseline;
pub mod ocr;
pub mod types;

pub use baseline::*;
pub use ocr::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("No usable text could be extracted from the document")]
    NoUsableText,

    #[error("OCR engine failed: {0}")]
    Engine(String),
}

use crate::models::Document;

use super::types::{OcrEngine, OcrOutcome};
use super::ExtractionError;

/// Confidence reported for text captured digitally at upload time.
const PASSTHROUGH_CONFIDENCE: f32 = 0.99;

/// OCR engine for documents whose text was already captured at upload —
/// re-emits the stored raw text with near-perfect confidence. Documents
/// arriving as images are served by a real OCR engine behind the same
/// trait.
pub struct PassthroughOcr;

impl OcrEngine for PassthroughOcr {
    fn extract_text(&self, document: &Document) -> Result<OcrOutcome, ExtractionError> {
        let text = document.raw_text.trim();
        if text.is_empty() {
            return Err(ExtractionError::NoUsableText);
        }
        Ok(OcrOutcome {
            text: text.to_string(),
            confidence: PASSTHROUGH_CONFIDENCE,
        })
    }
}

/// Mock OCR engine for testing — returns configured text and confidence.
pub struct MockOcrEngine {
    text: String,
    confidence: f32,
}

impl MockOcrEngine {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            confidence,
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn extract_text(&self, _document: &Document) -> Result<OcrOutcome, ExtractionError> {
        if self.text.trim().is_empty() {
            return Err(ExtractionError::NoUsableText);
        }
        Ok(OcrOutcome {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

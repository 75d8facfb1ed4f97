use crate::models::{Document, EntitySet};

use super::ExtractionError;

/// Text plus raw quality confidence from the upstream OCR producer.
#[derive(Debug, Clone)]
pub struct OcrOutcome {
    pub text: String,
    /// Raw OCR confidence in [0, 1].
    pub confidence: f32,
}

/// Upstream image-to-text producer. The pipeline only consumes the text
/// blob and raw confidence; how they are produced is out of scope.
pub trait OcrEngine {
    fn extract_text(&self, document: &Document) -> Result<OcrOutcome, ExtractionError>;
}

/// Deterministic local entity extractor — the baseline set is always
/// present, independent of AI availability.
pub trait BaselineExtractor {
    fn extract(&self, text: &str) -> EntitySet;
}

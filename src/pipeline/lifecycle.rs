//! Document lifecycle transition graph and stage progress mapping.
//!
//! Nominal forward order:
//! `uploaded → need_scanning → scanned → analyzing → processing →
//! digitized → completed`, with `error` reachable from any non-terminal
//! state. Pre-OCR scanning stages apply only to handwritten input;
//! existing scans jump straight to `analyzing`.

use crate::models::enums::{DocumentStatus, InputFormat};

impl DocumentStatus {
    /// True for states the pipeline never leaves on its own.
    /// Re-entry from `error` happens only via explicit resubmission.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Error)
    }

    /// Whether the state machine allows `self → next`.
    pub fn can_transition(&self, next: DocumentStatus) -> bool {
        use DocumentStatus::*;
        if next == Error {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (Uploaded, NeedScanning)
                | (Uploaded, Scanned)
                | (Uploaded, Analyzing)
                | (NeedScanning, Scanned)
                | (Scanned, Analyzing)
                | (Analyzing, Processing)
                | (Processing, Digitized)
                | (Digitized, Completed)
        )
    }

    /// Progress value reported on entering this state. `None` for `error`,
    /// where progress is frozen at its last value.
    pub fn progress_target(&self) -> Option<u8> {
        match self {
            DocumentStatus::Uploaded => Some(0),
            DocumentStatus::NeedScanning => Some(10),
            DocumentStatus::Scanned => Some(20),
            DocumentStatus::Analyzing => Some(40),
            DocumentStatus::Processing => Some(60),
            DocumentStatus::Digitized => Some(80),
            DocumentStatus::Completed => Some(100),
            DocumentStatus::Error => None,
        }
    }
}

/// Pre-OCR stages a document passes through before `analyzing`,
/// determined by its input format.
pub fn scan_route(input_format: InputFormat) -> &'static [DocumentStatus] {
    match input_format {
        // A photo needs a full scanning pass first
        InputFormat::HandwrittenPhoto => &[DocumentStatus::NeedScanning, DocumentStatus::Scanned],
        // A handwritten scan is already in scanned form
        InputFormat::HandwrittenScan => &[DocumentStatus::Scanned],
        // Digital/scanned input skips straight to analysis
        InputFormat::ExistingScan => &[],
    }
}

//! Mediscribe — local medical document digitization pipeline.
//!
//! Takes uploaded documents (scans, photos, handwritten notes) through a
//! staged lifecycle: OCR text extraction, regex baseline entity extraction,
//! optional AI enhancement with merge-and-fallback semantics, confidence
//! scoring, patient resolution, and markdown formatting. Everything is
//! persisted locally in SQLite; no data leaves the machine except requests
//! to a locally configured AI endpoint.

pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod resolver;

pub use models::{Document, DocumentStatus, DocumentType, EntitySet, InputFormat, Patient};
pub use pipeline::{
    build_processor, create_document, DocumentProcessor, ProcessingError, ProcessingOutcome,
};
pub use resolver::{PatientResolver, ResolverError};

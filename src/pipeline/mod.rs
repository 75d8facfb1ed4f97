pub mod confidence;
pub mod enhancement;
pub mod extraction;
pub mod format;
pub mod lifecycle;
pub mod processor;

pub use confidence::*;
pub use enhancement::*;
pub use extraction::*;
pub use format::*;
pub use lifecycle::*;
pub use processor::*;

use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::enums::DocumentStatus;
use crate::resolver::ResolverError;

/// Errors that can occur while driving a document through the pipeline.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    #[error("Document is in state {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: DocumentStatus,
        actual: DocumentStatus,
    },

    #[error("Pipeline run superseded by a newer generation")]
    StaleRun,

    #[error("Extraction failed: {0}")]
    Extraction(#[from] extraction::ExtractionError),

    #[error("Patient resolution failed: {0}")]
    Resolver(#[from] ResolverError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("AI client initialization failed: {0}")]
    AiInit(String),
}

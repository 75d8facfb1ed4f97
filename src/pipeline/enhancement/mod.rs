pub mod client;
pub mod merge;
pub mod parser;
pub mod prompt;

pub use client::*;
pub use merge::*;
pub use parser::*;
pub use prompt::*;

use thiserror::Error;

/// Failures of the AI enhancement pass. All of these are transient from
/// the pipeline's perspective: the merger absorbs them and falls back to
/// the baseline extraction, never failing the document.
#[derive(Error, Debug)]
pub enum EnhancementError {
    #[error("AI service is not reachable at {0}")]
    Connection(String),

    #[error("AI request timed out after {0}s")]
    Timeout(u64),

    #[error("AI service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("AI response does not match the entity schema: {0}")]
    SchemaMismatch(String),
}

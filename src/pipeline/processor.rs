//! Document processing orchestrator.
//!
//! Single entry point that drives one document through the lifecycle:
//! scanning stages → analyzing (OCR + baseline + AI merge + scoring) →
//! processing (patient resolution) → digitized (formatting) → completed.
//!
//! Uses trait-based DI for the OCR engine, baseline extractor, and AI
//! client so the orchestrator is fully testable with mocks. Every stage
//! write carries the run's generation; writes from superseded runs are
//! discarded by the repository layer.

use std::time::Instant;

use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::db::repository;
use crate::models::enums::{DocumentStatus, DocumentType, InputFormat};
use crate::models::Document;
use crate::resolver::PatientResolver;

use super::confidence::score_confidence;
use super::enhancement::{AiConfig, EntityMerger, HttpAiClient};
use super::extraction::{
    BaselineExtractor, OcrEngine, PassthroughOcr, RegexBaselineExtractor,
};
use super::format::format_document;
use super::lifecycle::scan_route;
use super::ProcessingError;

/// Summary of one completed pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingOutcome {
    pub document_id: Uuid,
    pub status: DocumentStatus,
    pub patient_id: Uuid,
    pub confidence_score: u8,
    pub ai_enhanced: bool,
    pub entities_count: usize,
    pub processing_time_ms: u64,
}

/// Create a document in the `uploaded` state — the upload entry point.
pub fn create_document(
    conn: &Connection,
    patient_name: &str,
    doc_type: DocumentType,
    input_format: InputFormat,
    raw_text: &str,
    created_by: Option<&str>,
) -> Result<Document, ProcessingError> {
    let doc = Document::new(patient_name, doc_type, input_format, raw_text, created_by);
    repository::insert_document(conn, &doc)?;
    tracing::info!(
        document_id = %doc.id,
        document_type = doc.doc_type.as_str(),
        input_format = doc.input_format.as_str(),
        "Document created"
    );
    Ok(doc)
}

/// Orchestrates document processing. Pure pipeline logic with trait-based
/// DI; hosting (scheduling, change-feed fan-out) belongs to the caller.
pub struct DocumentProcessor {
    ocr: Box<dyn OcrEngine + Send + Sync>,
    baseline: Box<dyn BaselineExtractor + Send + Sync>,
    merger: EntityMerger,
    resolver: PatientResolver,
}

impl DocumentProcessor {
    pub fn new(
        ocr: Box<dyn OcrEngine + Send + Sync>,
        baseline: Box<dyn BaselineExtractor + Send + Sync>,
        merger: EntityMerger,
        resolver: PatientResolver,
    ) -> Self {
        Self {
            ocr,
            baseline,
            merger,
            resolver,
        }
    }

    /// Run the full pipeline on an `uploaded` document.
    ///
    /// Structural failures (no usable text, resolver/datastore errors)
    /// persist `status = error` before the error is returned. AI failures
    /// never surface here — the merger absorbs them.
    pub fn process_document(
        &self,
        conn: &Connection,
        document_id: &Uuid,
    ) -> Result<ProcessingOutcome, ProcessingError> {
        let doc = repository::get_document(conn, document_id)?
            .ok_or(ProcessingError::DocumentNotFound(*document_id))?;
        if doc.status != DocumentStatus::Uploaded {
            return Err(ProcessingError::InvalidState {
                expected: DocumentStatus::Uploaded,
                actual: doc.status,
            });
        }

        let generation = doc.run_generation;
        let start = Instant::now();
        tracing::info!(
            document_id = %doc.id,
            generation,
            input_format = doc.input_format.as_str(),
            "Pipeline run starting"
        );

        // Pre-OCR scanning stages, determined by input format
        let mut state = DocumentStatus::Uploaded;
        for &stage in scan_route(doc.input_format) {
            self.advance(conn, &doc.id, generation, &mut state, stage)?;
        }

        // Analyzing: OCR → baseline extraction → AI merge → scoring
        self.advance(conn, &doc.id, generation, &mut state, DocumentStatus::Analyzing)?;
        let ocr = match self.ocr.extract_text(&doc) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(document_id = %doc.id, error = %e, "Extraction failed");
                repository::mark_error(conn, &doc.id, generation, state.as_str())?;
                return Err(e.into());
            }
        };
        let baseline = self.baseline.extract(&ocr.text);
        let merged = self.merger.merge(&ocr.text, &baseline);
        let score = score_confidence(
            ocr.confidence,
            merged.ai_enhanced(),
            merged.entities.completeness(),
        );

        let ai_payload = merged.ai_enhanced().then_some(&merged.entities);
        if !repository::set_extraction_results(
            conn, &doc.id, generation, &ocr.text, &baseline, ai_payload, score,
        )? {
            return Err(ProcessingError::StaleRun);
        }

        // Processing: bind the document to a patient
        self.advance(conn, &doc.id, generation, &mut state, DocumentStatus::Processing)?;
        let patient_id = match doc.patient_id {
            // Once bound, never reassigned — a resubmitted run keeps it
            Some(existing) => existing,
            None => {
                let resolved = match self.resolver.find_or_create(conn, &doc.patient_name) {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::error!(
                            document_id = %doc.id,
                            error = %e,
                            "Patient resolution failed"
                        );
                        repository::mark_error(conn, &doc.id, generation, state.as_str())?;
                        return Err(e.into());
                    }
                };
                if !repository::bind_patient(conn, &doc.id, generation, &resolved)? {
                    return Err(ProcessingError::StaleRun);
                }
                resolved
            }
        };

        // Digitized: finalize the structured output
        self.advance(conn, &doc.id, generation, &mut state, DocumentStatus::Digitized)?;
        let formatted =
            format_document(doc.doc_type, &doc.patient_name, &ocr.text, &merged.entities);
        if !repository::set_formatted_text(conn, &doc.id, generation, &formatted)? {
            return Err(ProcessingError::StaleRun);
        }

        self.advance(conn, &doc.id, generation, &mut state, DocumentStatus::Completed)?;
        let processing_time_ms = start.elapsed().as_millis() as u64;
        if !repository::set_processing_time(conn, &doc.id, generation, processing_time_ms)? {
            return Err(ProcessingError::StaleRun);
        }

        tracing::info!(
            document_id = %doc.id,
            patient_id = %patient_id,
            confidence = score,
            ai_enhanced = merged.ai_enhanced(),
            processing_time_ms,
            "Pipeline run complete"
        );

        Ok(ProcessingOutcome {
            document_id: doc.id,
            status: DocumentStatus::Completed,
            patient_id,
            confidence_score: score,
            ai_enhanced: merged.ai_enhanced(),
            entities_count: merged.entities.total_entities(),
            processing_time_ms,
        })
    }

    /// Resubmit an errored document: reset it to `uploaded` under a fresh
    /// generation and replay the pipeline.
    pub fn resubmit(
        &self,
        conn: &Connection,
        document_id: &Uuid,
    ) -> Result<ProcessingOutcome, ProcessingError> {
        repository::resubmit_document(conn, document_id)?;
        self.process_document(conn, document_id)
    }

    fn advance(
        &self,
        conn: &Connection,
        document_id: &Uuid,
        generation: u64,
        state: &mut DocumentStatus,
        next: DocumentStatus,
    ) -> Result<(), ProcessingError> {
        if !state.can_transition(next) {
            return Err(ProcessingError::InvalidState {
                expected: next,
                actual: *state,
            });
        }
        let progress = next.progress_target().unwrap_or(0);
        if !repository::update_stage(
            conn,
            document_id,
            generation,
            *state,
            next,
            next.as_str(),
            progress,
        )? {
            return Err(ProcessingError::StaleRun);
        }
        tracing::debug!(
            document_id = %document_id,
            from = state.as_str(),
            to = next.as_str(),
            progress,
            "Stage advanced"
        );
        *state = next;
        Ok(())
    }
}

/// Build a `DocumentProcessor` with production implementations:
/// passthrough OCR, regex baseline extractor, and an HTTP AI client when
/// a config is supplied (baseline-only otherwise).
pub fn build_processor(
    ai_config: Option<AiConfig>,
    created_by: Option<&str>,
) -> Result<DocumentProcessor, ProcessingError> {
    let merger = match ai_config {
        Some(config) => {
            tracing::info!(endpoint = %config.endpoint, model = %config.model, "AI enhancement enabled");
            let client = HttpAiClient::new(config)
                .map_err(|e| ProcessingError::AiInit(e.to_string()))?;
            EntityMerger::new(Some(Box::new(client)))
        }
        None => {
            tracing::info!("AI enhancement disabled — baseline extraction only");
            EntityMerger::baseline_only()
        }
    };

    Ok(DocumentProcessor::new(
        Box::new(PassthroughOcr),
        Box::new(RegexBaselineExtractor::new()),
        merger,
        PatientResolver::new(created_by),
    ))
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::EntitySet;
use super::enums::{DocumentStatus, DocumentType, InputFormat};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    /// Free-text patient name supplied at upload; may not yet resolve.
    pub patient_name: String,
    /// Bound by the resolver during the `processing` stage; never reassigned.
    pub patient_id: Option<Uuid>,
    pub doc_type: DocumentType,
    pub input_format: InputFormat,
    pub status: DocumentStatus,
    /// Advisory sub-stage label for progress reporting only.
    pub processing_stage: String,
    /// 0–100, monotonically non-decreasing while status != error.
    pub processing_progress: u8,
    pub raw_text: String,
    pub formatted_text: Option<String>,
    pub ocr_result: Option<EntitySet>,
    pub ai_structured_result: Option<EntitySet>,
    pub confidence_score: Option<u8>,
    pub processing_time_ms: Option<u64>,
    /// Bumped on resubmission; stage writes from stale runs are discarded.
    pub run_generation: u64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub created_by: Option<String>,
}

impl Document {
    /// New document in the `uploaded` state, ready for the pipeline.
    pub fn new(
        patient_name: &str,
        doc_type: DocumentType,
        input_format: InputFormat,
        raw_text: &str,
        created_by: Option<&str>,
    ) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            id: Uuid::new_v4(),
            patient_name: patient_name.to_string(),
            patient_id: None,
            doc_type,
            input_format,
            status: DocumentStatus::Uploaded,
            processing_stage: "uploaded".to_string(),
            processing_progress: 0,
            raw_text: raw_text.to_string(),
            formatted_text: None,
            ocr_result: None,
            ai_structured_result: None,
            confidence_score: None,
            processing_time_ms: None,
            run_generation: 0,
            created_at: now,
            updated_at: now,
            created_by: created_by.map(|s| s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_starts_uploaded() {
        let doc = Document::new(
            "Jane Doe",
            DocumentType::Prescription,
            InputFormat::ExistingScan,
            "Metformin 500mg twice daily",
            Some("tester"),
        );
        assert_eq!(doc.status, DocumentStatus::Uploaded);
        assert_eq!(doc.processing_progress, 0);
        assert_eq!(doc.run_generation, 0);
        assert!(doc.patient_id.is_none());
        assert!(doc.confidence_score.is_none());
        assert_eq!(doc.created_by.as_deref(), Some("tester"));
    }
}

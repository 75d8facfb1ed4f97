use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::*;
use crate::models::{Document, EntitySet};

use super::{now_text, parse_datetime};

const DOCUMENT_COLUMNS: &str = "id, patient_id, patient_name, document_type, input_format, status,
     processing_stage, processing_progress, raw_text, formatted_text, ocr_result,
     ai_structured_result, confidence_score, processing_time, run_generation,
     created_at, updated_at, created_by";

pub fn insert_document(conn: &Connection, doc: &Document) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO documents ({DOCUMENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)"
        ),
        params![
            doc.id.to_string(),
            doc.patient_id.map(|id| id.to_string()),
            doc.patient_name,
            doc.doc_type.as_str(),
            doc.input_format.as_str(),
            doc.status.as_str(),
            doc.processing_stage,
            doc.processing_progress,
            doc.raw_text,
            doc.formatted_text,
            doc.ocr_result
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            doc.ai_structured_result
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            doc.confidence_score,
            doc.processing_time_ms,
            doc.run_generation,
            doc.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            doc.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            doc.created_by,
        ],
    )?;
    Ok(())
}

pub fn get_document(conn: &Connection, id: &Uuid) -> Result<Option<Document>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"
    ))?;

    let result = stmt.query_row(params![id.to_string()], map_document_row);

    match result {
        Ok(row) => Ok(Some(document_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Get all documents in a given lifecycle status, newest first.
pub fn get_documents_by_status(
    conn: &Connection,
    status: DocumentStatus,
) -> Result<Vec<Document>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE status = ?1
         ORDER BY created_at DESC, id DESC"
    ))?;

    let rows = stmt.query_map(params![status.as_str()], map_document_row)?;

    let mut docs = Vec::new();
    for row in rows {
        docs.push(document_from_row(row?)?);
    }
    Ok(docs)
}

/// Advance a document's lifecycle stage.
///
/// Compare-and-swap: the write applies only when both the run generation
/// and the current status still match what the caller observed. A write
/// from a superseded run, or one racing another advance on the same
/// document, matches zero rows and returns `false`, leaving newer state
/// untouched. Progress is persisted through MAX() so it never decreases.
pub fn update_stage(
    conn: &Connection,
    document_id: &Uuid,
    generation: u64,
    expected: DocumentStatus,
    next: DocumentStatus,
    stage_label: &str,
    progress: u8,
) -> Result<bool, DatabaseError> {
    let rows = conn.execute(
        "UPDATE documents SET status = ?4, processing_stage = ?5,
         processing_progress = MAX(processing_progress, ?6), updated_at = ?7
         WHERE id = ?1 AND run_generation = ?2 AND status = ?3",
        params![
            document_id.to_string(),
            generation,
            expected.as_str(),
            next.as_str(),
            stage_label,
            progress,
            now_text(),
        ],
    )?;
    Ok(rows > 0)
}

/// Persist the analyzing-stage output: extraction payloads and the
/// aggregate confidence score. Generation-guarded.
pub fn set_extraction_results(
    conn: &Connection,
    document_id: &Uuid,
    generation: u64,
    raw_text: &str,
    ocr_result: &EntitySet,
    ai_structured_result: Option<&EntitySet>,
    confidence_score: u8,
) -> Result<bool, DatabaseError> {
    let ocr_json = serde_json::to_string(ocr_result)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;
    let ai_json = ai_structured_result
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

    let rows = conn.execute(
        "UPDATE documents SET raw_text = ?3, ocr_result = ?4,
         ai_structured_result = ?5, confidence_score = ?6, updated_at = ?7
         WHERE id = ?1 AND run_generation = ?2",
        params![
            document_id.to_string(),
            generation,
            raw_text,
            ocr_json,
            ai_json,
            confidence_score,
            now_text(),
        ],
    )?;
    Ok(rows > 0)
}

/// Bind a resolved patient to a document. Once set, `patient_id` is never
/// reassigned — the update only matches rows where it is still NULL.
pub fn bind_patient(
    conn: &Connection,
    document_id: &Uuid,
    generation: u64,
    patient_id: &Uuid,
) -> Result<bool, DatabaseError> {
    let rows = conn.execute(
        "UPDATE documents SET patient_id = ?3, updated_at = ?4
         WHERE id = ?1 AND run_generation = ?2 AND patient_id IS NULL",
        params![
            document_id.to_string(),
            generation,
            patient_id.to_string(),
            now_text(),
        ],
    )?;
    Ok(rows > 0)
}

/// Persist the digitized-stage output. Generation-guarded.
pub fn set_formatted_text(
    conn: &Connection,
    document_id: &Uuid,
    generation: u64,
    formatted_text: &str,
) -> Result<bool, DatabaseError> {
    let rows = conn.execute(
        "UPDATE documents SET formatted_text = ?3, updated_at = ?4
         WHERE id = ?1 AND run_generation = ?2",
        params![
            document_id.to_string(),
            generation,
            formatted_text,
            now_text(),
        ],
    )?;
    Ok(rows > 0)
}

/// Record wall-clock pipeline duration on completion. Generation-guarded.
pub fn set_processing_time(
    conn: &Connection,
    document_id: &Uuid,
    generation: u64,
    elapsed_ms: u64,
) -> Result<bool, DatabaseError> {
    let rows = conn.execute(
        "UPDATE documents SET processing_time = ?3, updated_at = ?4
         WHERE id = ?1 AND run_generation = ?2",
        params![document_id.to_string(), generation, elapsed_ms, now_text()],
    )?;
    Ok(rows > 0)
}

/// Transition a document into the terminal `error` state, freezing its
/// progress where it stopped. Generation-guarded so a superseded run
/// cannot fail a newer one, and restricted to non-terminal states: a
/// completed or already-errored document is never moved.
pub fn mark_error(
    conn: &Connection,
    document_id: &Uuid,
    generation: u64,
    stage_label: &str,
) -> Result<bool, DatabaseError> {
    let rows = conn.execute(
        "UPDATE documents SET status = 'error', processing_stage = ?3, updated_at = ?4
         WHERE id = ?1 AND run_generation = ?2 AND status NOT IN ('completed', 'error')",
        params![document_id.to_string(), generation, stage_label, now_text()],
    )?;
    Ok(rows > 0)
}

/// Reset an errored document to `uploaded` for a fresh pipeline run.
///
/// Bumps the run generation so in-flight writes from the failed run are
/// provably discardable. Extraction payloads and score are cleared;
/// `patient_id`, once bound, is kept. Returns the new generation.
pub fn resubmit_document(conn: &Connection, document_id: &Uuid) -> Result<u64, DatabaseError> {
    let rows = conn.execute(
        "UPDATE documents SET status = 'uploaded', processing_stage = 'uploaded',
         processing_progress = 0, formatted_text = NULL, ocr_result = NULL,
         ai_structured_result = NULL, confidence_score = NULL, processing_time = NULL,
         run_generation = run_generation + 1, updated_at = ?2
         WHERE id = ?1 AND status = 'error'",
        params![document_id.to_string(), now_text()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::ConstraintViolation(format!(
            "Document {document_id} is not in the error state"
        )));
    }

    let generation: u64 = conn.query_row(
        "SELECT run_generation FROM documents WHERE id = ?1",
        params![document_id.to_string()],
        |row| row.get(0),
    )?;
    tracing::info!(document_id = %document_id, generation, "Document resubmitted");
    Ok(generation)
}

// Internal row type for Document mapping
struct DocumentRow {
    id: String,
    patient_id: Option<String>,
    patient_name: String,
    document_type: String,
    input_format: String,
    status: String,
    processing_stage: String,
    processing_progress: u8,
    raw_text: String,
    formatted_text: Option<String>,
    ocr_result: Option<String>,
    ai_structured_result: Option<String>,
    confidence_score: Option<u8>,
    processing_time: Option<u64>,
    run_generation: u64,
    created_at: String,
    updated_at: String,
    created_by: Option<String>,
}

fn map_document_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        patient_name: row.get(2)?,
        document_type: row.get(3)?,
        input_format: row.get(4)?,
        status: row.get(5)?,
        processing_stage: row.get(6)?,
        processing_progress: row.get(7)?,
        raw_text: row.get(8)?,
        formatted_text: row.get(9)?,
        ocr_result: row.get(10)?,
        ai_structured_result: row.get(11)?,
        confidence_score: row.get(12)?,
        processing_time: row.get(13)?,
        run_generation: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
        created_by: row.get(17)?,
    })
}

fn parse_entity_json(
    payload: Option<String>,
    id: &str,
) -> Result<Option<EntitySet>, DatabaseError> {
    payload
        .map(|json| {
            serde_json::from_str(&json).map_err(|e| DatabaseError::CorruptPayload {
                entity_type: "Document".into(),
                id: id.into(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn document_from_row(row: DocumentRow) -> Result<Document, DatabaseError> {
    Ok(Document {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_id: row.patient_id.and_then(|s| Uuid::parse_str(&s).ok()),
        patient_name: row.patient_name,
        doc_type: DocumentType::from_str(&row.document_type)?,
        input_format: InputFormat::from_str(&row.input_format)?,
        status: DocumentStatus::from_str(&row.status)?,
        processing_stage: row.processing_stage,
        processing_progress: row.processing_progress,
        raw_text: row.raw_text,
        formatted_text: row.formatted_text,
        ocr_result: parse_entity_json(row.ocr_result, &row.id)?,
        ai_structured_result: parse_entity_json(row.ai_structured_result, &row.id)?,
        confidence_score: row.confidence_score,
        processing_time_ms: row.processing_time,
        run_generation: row.run_generation,
        created_at: parse_datetime(&row.created_at, "Document", &row.id)?,
        updated_at: parse_datetime(&row.updated_at, "Document", &row.id)?,
        created_by: row.created_by,
    })
}

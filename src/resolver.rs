//! Patient resolver — binds free-text patient names to canonical
//! patient records, creating one on first unmatched reference.
//!
//! Creation is serialized per normalized name by the UNIQUE constraint on
//! `patients.normalized_name`: when two concurrent callers both observe
//! "no match", exactly one insert wins and the loser re-queries the
//! winner's row. The substring match itself is deliberately loose (it
//! tolerates partial/abbreviated name entry) and is documented as such.

use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::models::{normalize_name, Patient, PatientUpdate};

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Patient name is empty")]
    EmptyName,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Lost creation race for '{name}' but no winner row found")]
    RaceLostNoWinner { name: String },
}

/// Resolves free-text patient names to patient ids.
///
/// Explicitly constructed and passed to the pipeline — holds the identity
/// of the actor creating patients, nothing else.
pub struct PatientResolver {
    created_by: Option<String>,
}

impl PatientResolver {
    pub fn new(created_by: Option<&str>) -> Self {
        Self {
            created_by: created_by.map(|s| s.to_string()),
        }
    }

    /// Find a patient by case-insensitive substring match, creating one
    /// if no match exists. Returns the same id for concurrent calls with
    /// the same previously-unseen name.
    pub fn find_or_create(&self, conn: &Connection, name: &str) -> Result<Uuid, ResolverError> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return Err(ResolverError::EmptyName);
        }

        if let Some(existing) = repository::find_patient_by_name_fragment(conn, &normalized)? {
            tracing::debug!(
                patient_id = %existing.id,
                query = %normalized,
                matched = %existing.normalized_name,
                "Resolved patient by name match"
            );
            return Ok(existing.id);
        }

        let patient = Patient::new(name, self.created_by.as_deref());
        match repository::insert_patient(conn, &patient) {
            Ok(()) => {
                tracing::info!(patient_id = %patient.id, "Created patient for unmatched name");
                Ok(patient.id)
            }
            Err(e) if e.is_unique_violation() => {
                // Another caller created this patient between our lookup
                // and insert; return the winner's id.
                repository::find_patient_by_name_fragment(conn, &normalized)?
                    .map(|p| p.id)
                    .ok_or_else(|| ResolverError::RaceLostNoWinner {
                        name: normalized.clone(),
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a partial update; fields absent from `update` are untouched.
    pub fn update_patient(
        &self,
        conn: &Connection,
        id: &Uuid,
        update: &PatientUpdate,
    ) -> Result<(), ResolverError> {
        repository::update_patient(conn, id, update)?;
        Ok(())
    }
}

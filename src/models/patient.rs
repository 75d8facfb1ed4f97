use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    /// Canonical display name as first seen.
    pub name: String,
    /// Lowercased, whitespace-collapsed form of `name`; unique in the store.
    pub normalized_name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    /// Opaque to the core — owned by downstream consumers.
    pub contact_info: Option<serde_json::Value>,
    pub medical_history: Option<serde_json::Value>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub created_by: Option<String>,
}

impl Patient {
    pub fn new(name: &str, created_by: Option<&str>) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            normalized_name: normalize_name(name),
            age: None,
            gender: None,
            contact_info: None,
            medical_history: None,
            created_at: now,
            updated_at: now,
            created_by: created_by.map(|s| s.to_string()),
        }
    }
}

/// Normalize a patient name for matching: lowercase, collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Partial update for a patient — only `Some` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub contact_info: Option<serde_json::Value>,
    pub medical_history: Option<serde_json::Value>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.contact_info.is_none()
            && self.medical_history.is_none()
    }
}

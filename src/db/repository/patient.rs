use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Patient, PatientUpdate};

use super::{now_text, parse_datetime};

const PATIENT_COLUMNS: &str = "id, name, normalized_name, age, gender, contact_info,
     medical_history, created_at, updated_at, created_by";

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO patients ({PATIENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ),
        params![
            patient.id.to_string(),
            patient.name,
            patient.normalized_name,
            patient.age,
            patient.gender,
            patient
                .contact_info
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            patient
                .medical_history
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            patient.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            patient.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            patient.created_by,
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"
    ))?;

    let result = stmt.query_row(params![id.to_string()], map_patient_row);
    match result {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Find a patient whose normalized name contains the given normalized
/// fragment. Ties break toward the most recently created patient, then
/// the highest id, so repeated lookups are stable.
pub fn find_patient_by_name_fragment(
    conn: &Connection,
    normalized_fragment: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         WHERE instr(normalized_name, ?1) > 0
         ORDER BY created_at DESC, id DESC LIMIT 1"
    ))?;

    let result = stmt.query_row(params![normalized_fragment], map_patient_row);
    match result {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Apply a partial update: only fields present in `update` are written.
pub fn update_patient(
    conn: &Connection,
    id: &Uuid,
    update: &PatientUpdate,
) -> Result<(), DatabaseError> {
    if update.is_empty() {
        return Ok(());
    }

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(name) = &update.name {
        sets.push(format!("name = ?{}", values.len() + 2));
        values.push(Box::new(name.clone()));
        sets.push(format!("normalized_name = ?{}", values.len() + 2));
        values.push(Box::new(crate::models::normalize_name(name)));
    }
    if let Some(age) = update.age {
        sets.push(format!("age = ?{}", values.len() + 2));
        values.push(Box::new(age));
    }
    if let Some(gender) = &update.gender {
        sets.push(format!("gender = ?{}", values.len() + 2));
        values.push(Box::new(gender.clone()));
    }
    if let Some(contact) = &update.contact_info {
        sets.push(format!("contact_info = ?{}", values.len() + 2));
        values.push(Box::new(
            serde_json::to_string(contact)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        ));
    }
    if let Some(history) = &update.medical_history {
        sets.push(format!("medical_history = ?{}", values.len() + 2));
        values.push(Box::new(
            serde_json::to_string(history)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        ));
    }

    sets.push(format!("updated_at = ?{}", values.len() + 2));
    values.push(Box::new(now_text()));

    let sql = format!("UPDATE patients SET {} WHERE id = ?1", sets.join(", "));
    let id_str = id.to_string();
    let mut args: Vec<&dyn rusqlite::ToSql> = Vec::with_capacity(values.len() + 1);
    args.push(&id_str);
    for v in &values {
        args.push(v.as_ref());
    }

    let rows = conn.execute(&sql, args.as_slice())?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

// Internal row type for Patient mapping
struct PatientRow {
    id: String,
    name: String,
    normalized_name: String,
    age: Option<u32>,
    gender: Option<String>,
    contact_info: Option<String>,
    medical_history: Option<String>,
    created_at: String,
    updated_at: String,
    created_by: Option<String>,
}

fn map_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        name: row.get(1)?,
        normalized_name: row.get(2)?,
        age: row.get(3)?,
        gender: row.get(4)?,
        contact_info: row.get(5)?,
        medical_history: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        created_by: row.get(9)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    let parse_json = |payload: Option<String>| -> Option<serde_json::Value> {
        payload.and_then(|json| serde_json::from_str(&json).ok())
    };

    Ok(Patient {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        name: row.name,
        normalized_name: row.normalized_name,
        age: row.age,
        gender: row.gender,
        contact_info: parse_json(row.contact_info),
        medical_history: parse_json(row.medical_history),
        created_at: parse_datetime(&row.created_at, "Patient", &row.id)?,
        updated_at: parse_datetime(&row.updated_at, "Patient", &row.id)?,
        created_by: row.created_by,
    })
}

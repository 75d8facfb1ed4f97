use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;

use super::{now_text, parse_datetime};

/// One row of the append-only change record. The pipeline never reads
/// these; they exist for external collaborators (sync, presentation).
#[derive(Debug, Clone)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub table_name: String,
    pub record_id: String,
    pub action: String,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub user_id: Option<String>,
    pub timestamp: NaiveDateTime,
}

pub fn insert_audit_log(
    conn: &Connection,
    table_name: &str,
    record_id: &str,
    action: &str,
    old_data: Option<&serde_json::Value>,
    new_data: Option<&serde_json::Value>,
    user_id: Option<&str>,
) -> Result<Uuid, DatabaseError> {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO audit_logs (id, table_name, record_id, action, old_data, new_data, user_id, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id.to_string(),
            table_name,
            record_id,
            action,
            old_data.map(|v| v.to_string()),
            new_data.map(|v| v.to_string()),
            user_id,
            now_text(),
        ],
    )?;
    Ok(id)
}

/// All audit entries for one record, oldest first.
pub fn get_audit_logs_for_record(
    conn: &Connection,
    table_name: &str,
    record_id: &str,
) -> Result<Vec<AuditLogEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, table_name, record_id, action, old_data, new_data, user_id, timestamp
         FROM audit_logs WHERE table_name = ?1 AND record_id = ?2
         ORDER BY timestamp ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![table_name, record_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, String>(7)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, table_name, record_id, action, old_data, new_data, user_id, timestamp) = row?;
        entries.push(AuditLogEntry {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            table_name,
            record_id,
            action,
            old_data: old_data.and_then(|s| serde_json::from_str(&s).ok()),
            new_data: new_data.and_then(|s| serde_json::from_str(&s).ok()),
            user_id,
            timestamp: parse_datetime(&timestamp, "AuditLog", &id)?,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn append_and_read_back() {
        let conn = open_memory_database().unwrap();
        let new_data = serde_json::json!({"status": "completed"});

        insert_audit_log(
            &conn,
            "documents",
            "doc-1",
            "update",
            None,
            Some(&new_data),
            Some("admin"),
        )
        .unwrap();

        let entries = get_audit_logs_for_record(&conn, "documents", "doc-1").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "update");
        assert_eq!(entries[0].new_data.as_ref().unwrap()["status"], "completed");
        assert!(entries[0].old_data.is_none());
    }

    #[test]
    fn entries_scoped_by_record() {
        let conn = open_memory_database().unwrap();
        insert_audit_log(&conn, "documents", "doc-1", "insert", None, None, None).unwrap();
        insert_audit_log(&conn, "patients", "pat-1", "insert", None, None, None).unwrap();

        let entries = get_audit_logs_for_record(&conn, "documents", "doc-1").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].table_name, "documents");
    }
}

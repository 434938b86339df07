use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Notification;
use crate::models::enums::NotificationType;

pub fn insert_notification(conn: &Connection, notif: &Notification) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO notifications (id, type, patient_id, patient_name, medication_id,
         schedule_id, timestamp, read, message)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            notif.id.to_string(),
            notif.notification_type.as_str(),
            notif.patient_id,
            notif.patient_name,
            notif.medication_id.to_string(),
            notif.schedule_id,
            notif.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            notif.read as i32,
            notif.message,
        ],
    )?;
    Ok(())
}

/// Unread notifications for a patient, newest first.
///
/// Nothing in this crate flips `read` to true, so this set only grows
/// across dose markings.
pub fn get_unread_for_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<Notification>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, type, patient_id, patient_name, medication_id, schedule_id,
         timestamp, read, message
         FROM notifications WHERE patient_id = ?1 AND read = 0
         ORDER BY timestamp DESC",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, i32>(7)?,
            row.get::<_, String>(8)?,
        ))
    })?;

    let mut notifs = Vec::new();
    for row in rows {
        let (id, kind, patient_id, patient_name, medication_id, schedule_id, timestamp, read, message) =
            row?;
        notifs.push(Notification {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            notification_type: NotificationType::from_str(&kind)?,
            patient_id,
            patient_name,
            medication_id: Uuid::parse_str(&medication_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            schedule_id,
            timestamp: NaiveDateTime::parse_from_str(&timestamp, "%Y-%m-%d %H:%M:%S")
                .unwrap_or_default(),
            read: read != 0,
            message,
        });
    }
    Ok(notifs)
}

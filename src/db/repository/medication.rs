use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Medication, ScheduleSlot};
use crate::models::enums::DoseStatus;

pub fn insert_medication(conn: &Connection, med: &Medication) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, patient_id, name, dosage, frequency, supply_left,
         schedules, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            med.id.to_string(),
            med.patient_id,
            med.name,
            med.dosage,
            med.frequency,
            med.supply_left,
            schedules_to_json(&med.schedules)?,
            med.last_updated.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        ],
    )?;
    Ok(())
}

pub fn get_medication(conn: &Connection, med_id: &Uuid) -> Result<Medication, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, name, dosage, frequency, supply_left, schedules, last_updated
         FROM medications WHERE id = ?1",
    )?;

    let row = stmt
        .query_row(params![med_id.to_string()], |row| {
            Ok(medication_row_from_rusqlite(row))
        })
        .optional()?;

    match row {
        Some(row) => medication_from_row(row?),
        None => Err(DatabaseError::NotFound {
            entity_type: "Medication".into(),
            id: med_id.to_string(),
        }),
    }
}

/// All medication records for a patient, the dashboard's list query.
pub fn get_medications_for_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, name, dosage, frequency, supply_left, schedules, last_updated
         FROM medications WHERE patient_id = ?1 ORDER BY name",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok(medication_row_from_rusqlite(row))
    })?;

    let mut meds = Vec::new();
    for row in rows {
        meds.push(medication_from_row(row??)?);
    }
    Ok(meds)
}

/// Set one schedule slot to taken and stamp the record's `last_updated`.
///
/// No transition guard: re-marking a taken slot overwrites `taken_at` and
/// leaves the status taken. A slot id absent from the map is created, as a
/// nested-field update against the stored document would.
pub fn mark_schedule_taken(
    conn: &Connection,
    med_id: &Uuid,
    schedule_id: &str,
    now: NaiveDateTime,
) -> Result<(), DatabaseError> {
    let mut schedules = load_schedules(conn, med_id)?;

    let slot = schedules
        .entry(schedule_id.to_string())
        .or_insert_with(|| ScheduleSlot::pending(""));
    slot.status = DoseStatus::Taken;
    slot.taken_at = Some(now);

    conn.execute(
        "UPDATE medications SET schedules = ?1, last_updated = ?2 WHERE id = ?3",
        params![
            schedules_to_json(&schedules)?,
            now.format("%Y-%m-%d %H:%M:%S").to_string(),
            med_id.to_string(),
        ],
    )?;
    Ok(())
}

pub fn delete_medication(conn: &Connection, med_id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM medications WHERE id = ?1",
        params![med_id.to_string()],
    )?;
    Ok(())
}

fn load_schedules(
    conn: &Connection,
    med_id: &Uuid,
) -> Result<BTreeMap<String, ScheduleSlot>, DatabaseError> {
    let json: Option<String> = conn
        .query_row(
            "SELECT schedules FROM medications WHERE id = ?1",
            params![med_id.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    match json {
        Some(json) => schedules_from_json(&json),
        None => Err(DatabaseError::NotFound {
            entity_type: "Medication".into(),
            id: med_id.to_string(),
        }),
    }
}

fn schedules_to_json(schedules: &BTreeMap<String, ScheduleSlot>) -> Result<String, DatabaseError> {
    serde_json::to_string(schedules)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid schedule map: {e}")))
}

fn schedules_from_json(json: &str) -> Result<BTreeMap<String, ScheduleSlot>, DatabaseError> {
    serde_json::from_str(json)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid schedule map: {e}")))
}

// Internal row type for Medication mapping
struct MedicationRow {
    id: String,
    patient_id: String,
    name: String,
    dosage: String,
    frequency: String,
    supply_left: i64,
    schedules: String,
    last_updated: Option<String>,
}

fn medication_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<MedicationRow, rusqlite::Error> {
    Ok(MedicationRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        name: row.get(2)?,
        dosage: row.get(3)?,
        frequency: row.get(4)?,
        supply_left: row.get(5)?,
        schedules: row.get(6)?,
        last_updated: row.get(7)?,
    })
}

fn medication_from_row(row: MedicationRow) -> Result<Medication, DatabaseError> {
    Ok(Medication {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_id: row.patient_id,
        name: row.name,
        dosage: row.dosage,
        frequency: row.frequency,
        supply_left: row.supply_left,
        schedules: schedules_from_json(&row.schedules)?,
        last_updated: row
            .last_updated
            .and_then(|t| NaiveDateTime::parse_from_str(&t, "%Y-%m-%d %H:%M:%S").ok()),
    })
}

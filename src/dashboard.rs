//! Patient dashboard — backend operations and view types.
//!
//! Loads the patient header with linked doctor/guardian profiles, serves
//! the medication and unread-notification lists, and carries the two
//! mutations the screen performs: marking a dose taken and deleting a
//! medication. Both mutations publish fresh snapshots through the
//! `ChangeFeed` so live watchers update.

use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository::{
    find_by_role_id, get_medication, get_medications_for_patient, get_unread_for_patient,
    insert_notification, mark_schedule_taken,
};
use crate::db::{repository, DatabaseError};
use crate::feed::ChangeFeed;
use crate::models::enums::{NotificationType, Role, SupplyLevel};
use crate::models::{Account, Medication, Notification};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Everything the dashboard shows on load.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub patient: Account,
    pub assigned_doctor: Option<Account>,
    pub guardian: Option<Account>,
    pub medications: Vec<Medication>,
    pub notifications: Vec<Notification>,
}

/// Load the dashboard for a patient id (taken from the login session).
///
/// Linked doctor/guardian references that do not resolve stay `None`; the
/// dashboard renders its "no doctor assigned" state rather than failing.
pub fn load_dashboard(conn: &Connection, patient_id: &str) -> Result<DashboardData, DashboardError> {
    let patient = find_by_role_id(conn, patient_id, &Role::Patient)?
        .ok_or_else(|| DashboardError::PatientNotFound(patient_id.to_string()))?;

    let assigned_doctor = match patient.assigned_doctor_id.as_deref() {
        Some(id) => find_by_role_id(conn, id, &Role::Doctor)?,
        None => None,
    };
    let guardian = match patient.guardian_id.as_deref() {
        Some(id) => find_by_role_id(conn, id, &Role::Guardian)?,
        None => None,
    };

    let medications = get_medications_for_patient(conn, patient_id)?;
    let notifications = get_unread_for_patient(conn, patient_id)?;

    Ok(DashboardData {
        patient,
        assigned_doctor,
        guardian,
        medications,
        notifications,
    })
}

/// Classify remaining supply for display.
pub fn supply_level(supply_left: i64) -> SupplyLevel {
    if supply_left > 10 {
        SupplyLevel::Good
    } else if supply_left > 5 {
        SupplyLevel::Low
    } else {
        SupplyLevel::Critical
    }
}

/// Mark one schedule slot taken and record a notification for the
/// patient's doctor/guardian. Both writes commit in one transaction —
/// a failure of either leaves neither.
///
/// `supply_left` is intentionally untouched here; restocking is a
/// separate concern.
pub fn mark_dose_taken(
    conn: &Connection,
    feed: &mut ChangeFeed,
    medication_id: &Uuid,
    schedule_id: &str,
) -> Result<(), DashboardError> {
    let now = chrono::Local::now().naive_local();
    let med = get_medication(conn, medication_id)?;
    let patient_name = find_by_role_id(conn, &med.patient_id, &Role::Patient)?
        .map(|p| p.full_name)
        .unwrap_or_else(|| med.patient_id.clone());

    let notification = Notification {
        id: Uuid::new_v4(),
        notification_type: NotificationType::MedicationTaken,
        patient_id: med.patient_id.clone(),
        patient_name: patient_name.clone(),
        medication_id: *medication_id,
        schedule_id: schedule_id.to_string(),
        timestamp: now,
        read: false,
        message: format!("{patient_name} has taken their medication"),
    };

    let tx = conn.unchecked_transaction().map_err(DatabaseError::Sqlite)?;
    mark_schedule_taken(&tx, medication_id, schedule_id, now)?;
    insert_notification(&tx, &notification)?;
    tx.commit().map_err(DatabaseError::Sqlite)?;

    tracing::info!(
        medication_id = %medication_id,
        schedule_id,
        "Dose marked taken"
    );

    feed.publish_medications(conn, &med.patient_id)?;
    feed.publish_notifications(conn, &med.patient_id)?;
    Ok(())
}

/// Delete a medication record. Irreversible; the confirmation step is the
/// caller's UI concern.
pub fn delete_medication(
    conn: &Connection,
    feed: &mut ChangeFeed,
    medication_id: &Uuid,
) -> Result<(), DashboardError> {
    let med = get_medication(conn, medication_id)?;
    repository::delete_medication(conn, medication_id)?;

    tracing::info!(medication_id = %medication_id, name = %med.name, "Medication deleted");

    feed.publish_medications(conn, &med.patient_id)?;
    Ok(())
}

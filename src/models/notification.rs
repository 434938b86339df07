use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::NotificationType;

/// Notification record created as a side effect of marking a dose taken.
///
/// `read` is stored but no operation in this crate transitions it to true;
/// the unread set for a patient only grows through reachable code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub notification_type: NotificationType,
    pub patient_id: String,
    pub patient_name: String,
    pub medication_id: Uuid,
    pub schedule_id: String,
    pub timestamp: NaiveDateTime,
    pub read: bool,
    pub message: String,
}

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DoseStatus;

/// A medication record with its per-slot dose schedule.
///
/// `schedules` maps a slot id (e.g. `"morning"`, `"slot-1"`) to the slot
/// state; it is persisted as a JSON column. `supply_left` counts remaining
/// physical doses and is not touched by dose marking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub patient_id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub supply_left: i64,
    pub schedules: BTreeMap<String, ScheduleSlot>,
    pub last_updated: Option<NaiveDateTime>,
}

/// One scheduled dose time within a medication's schedule map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub time: String,
    pub status: DoseStatus,
    pub taken_at: Option<NaiveDateTime>,
}

impl ScheduleSlot {
    pub fn pending(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            status: DoseStatus::Pending,
            taken_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_slot_serializes_with_camel_case_keys() {
        let slot = ScheduleSlot::pending("08:00");
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["time"], "08:00");
        assert_eq!(json["status"], "pending");
        assert!(json["takenAt"].is_null());
    }

    #[test]
    fn schedule_slot_round_trips() {
        let slot = ScheduleSlot {
            time: "20:00".into(),
            status: DoseStatus::Taken,
            taken_at: Some(
                chrono::NaiveDate::from_ymd_opt(2025, 3, 14)
                    .unwrap()
                    .and_hms_opt(20, 5, 0)
                    .unwrap(),
            ),
        };
        let json = serde_json::to_string(&slot).unwrap();
        let back: ScheduleSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slot);
    }
}

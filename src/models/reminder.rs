use serde::{Deserialize, Serialize};

/// A reminder kept entirely in the local store — a parallel, offline flow
/// unrelated to the `medications` table and never synchronized with it.
///
/// The stored JSON uses camelCase keys. Older producers wrote the patient
/// field as `patient` instead of `patientId`; the alias accepts both, and
/// `supply` / `taken` / `dateAdded` default when absent from legacy rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalReminder {
    pub id: String,
    #[serde(alias = "patient")]
    pub patient_id: String,
    pub medicine: String,
    pub dosage: String,
    pub time: String,
    #[serde(default)]
    pub supply: String,
    #[serde(default)]
    pub taken: bool,
    #[serde(default)]
    pub date_added: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_patient_key() {
        let json = r#"{
            "id": "1730000000000",
            "patient": "Maria Cruz",
            "medicine": "Aspirin",
            "dosage": "1 tablet",
            "time": "8:00 AM",
            "dateAdded": "10/27/2024, 8:00:00 AM"
        }"#;
        let r: LocalReminder = serde_json::from_str(json).unwrap();
        assert_eq!(r.patient_id, "Maria Cruz");
        assert_eq!(r.supply, "");
        assert!(!r.taken);
    }

    #[test]
    fn serializes_camel_case_keys() {
        let r = LocalReminder {
            id: "1".into(),
            patient_id: "P1".into(),
            medicine: "Aspirin".into(),
            dosage: "1".into(),
            time: "2025-03-14 08:00".into(),
            supply: "10".into(),
            taken: false,
            date_added: "2025-03-13 19:00:00".into(),
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["patientId"], "P1");
        assert_eq!(json["dateAdded"], "2025-03-13 19:00:00");
        assert!(json.get("patient_id").is_none());
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::Role;

/// Role-polymorphic account record. One record type for all three roles;
/// `role` decides which of the optional fields are meaningful.
///
/// `id` is the generated role-prefixed ID (`PAT-4G7XQ2`), which is also the
/// record's primary key. `password` holds the stored credential — a
/// PBKDF2 hash string for accounts created here, possibly legacy plaintext
/// for imported rows (see `crate::crypto`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub role: Role,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub contact_number: String,
    pub profile_pic: String,
    pub sex: Option<String>,
    pub date_of_birth: Option<NaiveDate>,

    // Doctor
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub hospital: Option<String>,

    // Guardian
    pub relationship_to_patient: Option<String>,

    // Patient
    pub medical_condition: Option<String>,
    pub assigned_doctor_id: Option<String>,
    pub guardian_id: Option<String>,

    pub created_at: NaiveDateTime,
}

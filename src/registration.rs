//! Account registration — per-role validation, ID generation, insert.
//!
//! One input type serves all three roles; validation checks the fields the
//! role's form requires. Sex and date of birth are optional on every form.

use chrono::NaiveDate;
use rand::Rng;
use rusqlite::Connection;
use thiserror::Error;

use crate::crypto;
use crate::db::repository::insert_account;
use crate::db::DatabaseError;
use crate::models::enums::Role;
use crate::models::Account;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("A profile picture is required")]
    MissingProfilePic,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Registration form state for any role.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub contact_number: String,
    pub profile_pic: Option<String>,
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
}

/// Generate a role-prefixed account ID: `{PREFIX}-{6 uppercase alphanumeric}`.
///
/// Uniqueness is probabilistic only — no collision check is made against
/// existing rows.
pub fn generate_account_id(role: &Role) -> String {
    const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{suffix}", role.id_prefix())
}

/// Validate the form for the given role, create the account, and insert it.
///
/// Validation failures abort before any write. The password is hashed
/// before storage; the plaintext never reaches the database.
pub fn register(
    conn: &Connection,
    role: Role,
    input: &RegistrationInput,
) -> Result<Account, RegistrationError> {
    validate(&role, input)?;

    let profile_pic = input
        .profile_pic
        .clone()
        .ok_or(RegistrationError::MissingProfilePic)?;

    let account = Account {
        id: generate_account_id(&role),
        role,
        full_name: input.full_name.clone(),
        email: input.email.clone(),
        password: crypto::hash_password(&input.password),
        contact_number: input.contact_number.clone(),
        profile_pic,
        sex: input.sex.clone(),
        date_of_birth: input.date_of_birth,
        specialization: input.specialization.clone(),
        license_number: input.license_number.clone(),
        hospital: input.hospital.clone(),
        relationship_to_patient: input.relationship_to_patient.clone(),
        medical_condition: input.medical_condition.clone(),
        assigned_doctor_id: input.assigned_doctor_id.clone(),
        guardian_id: input.guardian_id.clone(),
        created_at: chrono::Local::now().naive_local(),
    };

    insert_account(conn, &account)?;
    tracing::info!(account_id = %account.id, role = account.role.as_str(), "Account registered");
    Ok(account)
}

fn validate(role: &Role, input: &RegistrationInput) -> Result<(), RegistrationError> {
    require(&input.full_name, "full name")?;
    require(&input.email, "email")?;
    require(&input.password, "password")?;
    require(&input.contact_number, "contact number")?;
    if input.profile_pic.as_deref().unwrap_or("").is_empty() {
        return Err(RegistrationError::MissingProfilePic);
    }

    match role {
        Role::Doctor => {
            require_opt(&input.specialization, "specialization")?;
            require_opt(&input.license_number, "license number")?;
            require_opt(&input.hospital, "hospital")?;
        }
        Role::Guardian => {
            require_opt(&input.relationship_to_patient, "relationship to patient")?;
        }
        Role::Patient => {
            require_opt(&input.medical_condition, "medical condition")?;
        }
    }
    Ok(())
}

fn require(value: &str, field: &'static str) -> Result<(), RegistrationError> {
    if value.is_empty() {
        return Err(RegistrationError::MissingField(field));
    }
    Ok(())
}

fn require_opt(value: &Option<String>, field: &'static str) -> Result<(), RegistrationError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(RegistrationError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::get_account;
    use crate::db::sqlite::open_memory_database;

    fn patient_input() -> RegistrationInput {
        RegistrationInput {
            full_name: "Maria Cruz".into(),
            email: "maria@example.com".into(),
            password: "hunter2hunter2".into(),
            contact_number: "09171234567".into(),
            profile_pic: Some("file:///photos/maria.jpg".into()),
            sex: Some("Female".into()),
            date_of_birth: NaiveDate::from_ymd_opt(1954, 6, 2),
            medical_condition: Some("Hypertension".into()),
            ..Default::default()
        }
    }

    fn doctor_input() -> RegistrationInput {
        RegistrationInput {
            full_name: "Jose Rizal".into(),
            email: "rizal@example.com".into(),
            password: "secret-pass".into(),
            contact_number: "09179876543".into(),
            profile_pic: Some("file:///photos/rizal.jpg".into()),
            specialization: Some("Cardiology".into()),
            license_number: Some("PRC-102938".into()),
            hospital: Some("General Hospital".into()),
            ..Default::default()
        }
    }

    fn assert_id_shape(id: &str, prefix: &str) {
        let (head, suffix) = id.split_once('-').expect("prefixed id");
        assert_eq!(head, prefix);
        assert_eq!(suffix.len(), 6);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn generated_ids_match_role_prefix_and_shape() {
        for (role, prefix) in [
            (Role::Doctor, "DOC"),
            (Role::Guardian, "GAR"),
            (Role::Patient, "PAT"),
        ] {
            for _ in 0..20 {
                assert_id_shape(&generate_account_id(&role), prefix);
            }
        }
    }

    #[test]
    fn register_patient_round_trips() {
        let conn = open_memory_database().unwrap();
        let input = patient_input();
        let account = register(&conn, Role::Patient, &input).unwrap();
        assert_id_shape(&account.id, "PAT");

        let fetched = get_account(&conn, &account.id).unwrap();
        assert_eq!(fetched.role, Role::Patient);
        assert_eq!(fetched.full_name, input.full_name);
        assert_eq!(fetched.email, input.email);
        assert_eq!(fetched.contact_number, input.contact_number);
        assert_eq!(fetched.profile_pic, input.profile_pic.unwrap());
        assert_eq!(fetched.sex, input.sex);
        assert_eq!(fetched.date_of_birth, input.date_of_birth);
        assert_eq!(fetched.medical_condition, input.medical_condition);
    }

    #[test]
    fn password_is_stored_hashed() {
        let conn = open_memory_database().unwrap();
        let account = register(&conn, Role::Patient, &patient_input()).unwrap();
        assert_ne!(account.password, "hunter2hunter2");
        assert!(crypto::is_password_hash(&account.password));
        assert!(crypto::verify_password(&account.password, "hunter2hunter2").unwrap());
    }

    #[test]
    fn patient_requires_medical_condition() {
        let conn = open_memory_database().unwrap();
        let mut input = patient_input();
        input.medical_condition = Some(String::new());
        let err = register(&conn, Role::Patient, &input).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::MissingField("medical condition")
        ));
    }

    #[test]
    fn doctor_requires_license_fields() {
        let conn = open_memory_database().unwrap();
        let mut input = doctor_input();
        input.license_number = None;
        let err = register(&conn, Role::Doctor, &input).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::MissingField("license number")
        ));
    }

    #[test]
    fn guardian_requires_relationship() {
        let conn = open_memory_database().unwrap();
        let mut input = patient_input();
        input.medical_condition = None;
        let err = register(&conn, Role::Guardian, &input).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::MissingField("relationship to patient")
        ));
    }

    #[test]
    fn profile_picture_is_required() {
        let conn = open_memory_database().unwrap();
        let mut input = patient_input();
        input.profile_pic = None;
        let err = register(&conn, Role::Patient, &input).unwrap_err();
        assert!(matches!(err, RegistrationError::MissingProfilePic));

        // Validation happens before any write.
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn sex_and_date_of_birth_are_optional() {
        let conn = open_memory_database().unwrap();
        let mut input = doctor_input();
        input.sex = None;
        input.date_of_birth = None;
        let account = register(&conn, Role::Doctor, &input).unwrap();
        let fetched = get_account(&conn, &account.id).unwrap();
        assert_eq!(fetched.sex, None);
        assert_eq!(fetched.date_of_birth, None);
    }
}

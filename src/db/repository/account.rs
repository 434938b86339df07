use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::enums::Role;
use crate::models::Account;

pub fn insert_account(conn: &Connection, account: &Account) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, role, full_name, email, password, contact_number, profile_pic,
         sex, date_of_birth, specialization, license_number, hospital, relationship_to_patient,
         medical_condition, assigned_doctor_id, guardian_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            account.id,
            account.role.as_str(),
            account.full_name,
            account.email,
            account.password,
            account.contact_number,
            account.profile_pic,
            account.sex,
            account.date_of_birth.map(|d| d.to_string()),
            account.specialization,
            account.license_number,
            account.hospital,
            account.relationship_to_patient,
            account.medical_condition,
            account.assigned_doctor_id,
            account.guardian_id,
            account.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

/// Fetch an account by its generated role-prefixed ID.
pub fn get_account(conn: &Connection, id: &str) -> Result<Account, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, role, full_name, email, password, contact_number, profile_pic,
         sex, date_of_birth, specialization, license_number, hospital, relationship_to_patient,
         medical_condition, assigned_doctor_id, guardian_id, created_at
         FROM users WHERE id = ?1",
    )?;

    let row = stmt
        .query_row(params![id], |row| Ok(account_row_from_rusqlite(row)))
        .optional()?;

    match row {
        Some(row) => account_from_row(row?),
        None => Err(DatabaseError::NotFound {
            entity_type: "Account".into(),
            id: id.into(),
        }),
    }
}

/// Exact-match lookup by email. Email carries no uniqueness guarantee;
/// the first matching row wins, mirroring the login query.
pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<Account>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, role, full_name, email, password, contact_number, profile_pic,
         sex, date_of_birth, specialization, license_number, hospital, relationship_to_patient,
         medical_condition, assigned_doctor_id, guardian_id, created_at
         FROM users WHERE email = ?1 LIMIT 1",
    )?;

    let row = stmt
        .query_row(params![email], |row| Ok(account_row_from_rusqlite(row)))
        .optional()?;

    match row {
        Some(row) => Ok(Some(account_from_row(row?)?)),
        None => Ok(None),
    }
}

/// Resolve a role-specific ID reference (a patient's linked doctor or
/// guardian). The ID must exist with the expected role.
pub fn find_by_role_id(
    conn: &Connection,
    id: &str,
    role: &Role,
) -> Result<Option<Account>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, role, full_name, email, password, contact_number, profile_pic,
         sex, date_of_birth, specialization, license_number, hospital, relationship_to_patient,
         medical_condition, assigned_doctor_id, guardian_id, created_at
         FROM users WHERE id = ?1 AND role = ?2 LIMIT 1",
    )?;

    let row = stmt
        .query_row(params![id, role.as_str()], |row| {
            Ok(account_row_from_rusqlite(row))
        })
        .optional()?;

    match row {
        Some(row) => Ok(Some(account_from_row(row?)?)),
        None => Ok(None),
    }
}

// Internal row type for Account mapping
struct AccountRow {
    id: String,
    role: String,
    full_name: String,
    email: String,
    password: String,
    contact_number: String,
    profile_pic: String,
    sex: Option<String>,
    date_of_birth: Option<String>,
    specialization: Option<String>,
    license_number: Option<String>,
    hospital: Option<String>,
    relationship_to_patient: Option<String>,
    medical_condition: Option<String>,
    assigned_doctor_id: Option<String>,
    guardian_id: Option<String>,
    created_at: String,
}

fn account_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<AccountRow, rusqlite::Error> {
    Ok(AccountRow {
        id: row.get(0)?,
        role: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        password: row.get(4)?,
        contact_number: row.get(5)?,
        profile_pic: row.get(6)?,
        sex: row.get(7)?,
        date_of_birth: row.get(8)?,
        specialization: row.get(9)?,
        license_number: row.get(10)?,
        hospital: row.get(11)?,
        relationship_to_patient: row.get(12)?,
        medical_condition: row.get(13)?,
        assigned_doctor_id: row.get(14)?,
        guardian_id: row.get(15)?,
        created_at: row.get(16)?,
    })
}

fn account_from_row(row: AccountRow) -> Result<Account, DatabaseError> {
    Ok(Account {
        id: row.id,
        role: Role::from_str(&row.role)?,
        full_name: row.full_name,
        email: row.email,
        password: row.password,
        contact_number: row.contact_number,
        profile_pic: row.profile_pic,
        sex: row.sex,
        date_of_birth: row
            .date_of_birth
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        specialization: row.specialization,
        license_number: row.license_number,
        hospital: row.hospital,
        relationship_to_patient: row.relationship_to_patient,
        medical_condition: row.medical_condition,
        assigned_doctor_id: row.assigned_doctor_id,
        guardian_id: row.guardian_id,
        created_at: NaiveDateTime::parse_from_str(&row.created_at, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
    })
}

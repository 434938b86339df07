//! Login check — email lookup, password verification, role dispatch.
//!
//! The result is a `Session` carrying the authenticated account; callers
//! pass it (or its account id) into downstream screen operations instead of
//! relying on any shared current-user value.

use rusqlite::Connection;
use thiserror::Error;

use crate::crypto::{self, CryptoError};
use crate::db::repository::find_by_email;
use crate::db::DatabaseError;
use crate::models::enums::Role;
use crate::models::Account;

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Please enter both email and password")]
    MissingCredentials,

    #[error("No user found with this email")]
    UserNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

#[derive(Debug, Clone, Default)]
pub struct LoginConfig {
    /// Compare stored credentials that are not hash strings by plain
    /// equality, for rows imported from the legacy store. Off by default;
    /// freshly registered accounts always verify against a hash.
    pub accept_legacy_plaintext: bool,
}

/// Where the shell should navigate after a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    DoctorDashboard,
    GuardianDashboard,
    PatientDashboard,
}

/// An authenticated account.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
}

impl Session {
    pub fn account_id(&self) -> &str {
        &self.account.id
    }

    pub fn destination(&self) -> Destination {
        match self.account.role {
            Role::Doctor => Destination::DoctorDashboard,
            Role::Guardian => Destination::GuardianDashboard,
            Role::Patient => Destination::PatientDashboard,
        }
    }
}

pub fn login(
    conn: &Connection,
    email: &str,
    password: &str,
    config: &LoginConfig,
) -> Result<Session, LoginError> {
    if email.is_empty() || password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }

    let account = find_by_email(conn, email)?.ok_or(LoginError::UserNotFound)?;

    let verified = if crypto::is_password_hash(&account.password) {
        crypto::verify_password(&account.password, password)?
    } else if config.accept_legacy_plaintext {
        account.password == password
    } else {
        tracing::warn!(
            account_id = %account.id,
            "Stored credential is not a hash and legacy plaintext is disabled"
        );
        false
    };

    if !verified {
        return Err(LoginError::IncorrectPassword);
    }

    tracing::info!(account_id = %account.id, role = account.role.as_str(), "Login succeeded");
    Ok(Session { account })
}

//! MedMinder backend — role-based accounts, medication schedules with
//! live-updating queries, and an offline local reminder store.
//!
//! The crate is the data-and-interaction layer of a medication-reminder
//! app: a host shell renders screens and calls into `registration`,
//! `login`, `dashboard` and `reminders`; platform services (local
//! notifications, speech) come in through the `platform` traits.

pub mod config;
pub mod crypto;
pub mod dashboard;
pub mod db;
pub mod feed;
pub mod login;
pub mod models;
pub mod platform;
pub mod registration;
pub mod reminders;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a host binary. Honors `RUST_LOG`, defaulting to
/// info level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}

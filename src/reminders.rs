//! Local reminder store — the offline flow.
//!
//! One JSON file holds the whole reminder list; every mutation is a
//! read-modify-write of that file. The host UI shows one screen at a time,
//! so no locking discipline is applied to the file. Nothing here touches
//! the `medications` table; the two paths are never reconciled.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::config;
use crate::models::LocalReminder;
use crate::platform::{NotificationScheduler, SpeechSynthesizer};

/// Time format the add-reminder form asks for.
pub const REMINDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("No reminder at index {0}")]
    IndexOutOfRange(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupted reminder list: {0}")]
    Corrupted(#[from] serde_json::Error),
}

/// Add-reminder form state. Supply is optional free text; everything else
/// is required.
#[derive(Debug, Clone, Default)]
pub struct NewReminder {
    pub patient_id: String,
    pub medicine: String,
    pub dosage: String,
    pub time: String,
    pub supply: String,
}

pub struct ReminderStore {
    path: PathBuf,
}

impl ReminderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under the app data directory.
    pub fn open_default() -> Self {
        Self::new(config::reminders_path())
    }

    /// The full reminder list. A missing file reads as an empty list.
    pub fn list(&self) -> Result<Vec<LocalReminder>, ReminderError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Append a reminder and schedule its fire-once notification.
    ///
    /// The reminder is persisted whether or not its time is schedulable;
    /// an unparseable time only loses the notification.
    pub fn add(
        &self,
        input: &NewReminder,
        scheduler: &dyn NotificationScheduler,
    ) -> Result<LocalReminder, ReminderError> {
        validate(input)?;

        let now = chrono::Local::now();
        let reminder = LocalReminder {
            id: now.timestamp_millis().to_string(),
            patient_id: input.patient_id.clone(),
            medicine: input.medicine.clone(),
            dosage: input.dosage.clone(),
            time: input.time.clone(),
            supply: input.supply.clone(),
            taken: false,
            date_added: now.naive_local().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        let mut reminders = self.list()?;
        reminders.push(reminder.clone());
        self.save(&reminders)?;

        schedule_reminder_notification(scheduler, &reminder);
        tracing::info!(id = %reminder.id, medicine = %reminder.medicine, "Reminder added");
        Ok(reminder)
    }

    /// Mark the reminder at a positional index as taken.
    pub fn mark_taken(&self, index: usize) -> Result<(), ReminderError> {
        let mut reminders = self.list()?;
        let reminder = reminders
            .get_mut(index)
            .ok_or(ReminderError::IndexOutOfRange(index))?;
        reminder.taken = true;
        self.save(&reminders)
    }

    /// Remove a reminder by id. An unknown id is a no-op.
    pub fn remove(&self, id: &str) -> Result<(), ReminderError> {
        let mut reminders = self.list()?;
        reminders.retain(|r| r.id != id);
        self.save(&reminders)
    }

    fn save(&self, reminders: &[LocalReminder]) -> Result<(), ReminderError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(reminders)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

fn validate(input: &NewReminder) -> Result<(), ReminderError> {
    for (value, field) in [
        (&input.patient_id, "patient"),
        (&input.medicine, "medicine"),
        (&input.dosage, "dosage"),
        (&input.time, "time"),
    ] {
        if value.is_empty() {
            return Err(ReminderError::MissingField(field));
        }
    }
    Ok(())
}

/// Schedule the fire-once notification at the reminder's literal time.
/// Times that do not parse are logged and skipped; past times are handed
/// to the platform unchanged.
fn schedule_reminder_notification(scheduler: &dyn NotificationScheduler, reminder: &LocalReminder) {
    match NaiveDateTime::parse_from_str(&reminder.time, REMINDER_TIME_FORMAT) {
        Ok(trigger) => scheduler.schedule(
            "Medicine Reminder",
            &format!("Drink {} of {}", reminder.dosage, reminder.medicine),
            trigger,
        ),
        Err(e) => {
            tracing::warn!(time = %reminder.time, "Reminder time not schedulable: {e}");
        }
    }
}

/// Spoken announcement for a reminder.
pub fn reminder_announcement(reminder: &LocalReminder) -> String {
    format!(
        "Reminder: Drink {} of {} at {}",
        reminder.dosage, reminder.medicine, reminder.time
    )
}

/// Fire-and-forget speech playback for a reminder.
pub fn speak_reminder(synth: &dyn SpeechSynthesizer, reminder: &LocalReminder) {
    synth.speak(&reminder_announcement(reminder));
}

//! Live query subscriptions for the dashboard.
//!
//! `ChangeFeed` keeps a registry of watchers, each a channel sender paired
//! with a patient id and a query kind. Mutating operations call the
//! `publish_*` functions, which re-run the query once and push the fresh
//! snapshot to every matching watcher — the push-based change-feed model,
//! with explicit unsubscription tied to the consuming screen's lifetime.

use rusqlite::Connection;
use tokio::sync::mpsc;

use crate::db::repository::{get_medications_for_patient, get_unread_for_patient};
use crate::db::DatabaseError;
use crate::models::{Medication, Notification};

/// Snapshot pushed to a watcher whenever matching records change.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Medications(Vec<Medication>),
    Notifications(Vec<Notification>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchKind {
    Medications,
    UnreadNotifications,
}

/// Registration handle returned by `watch_*`. Pass it back to `unwatch`
/// when the consuming screen unmounts; a leaked handle keeps the watcher
/// registered until its receiver is dropped and the next publish prunes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchHandle(u64);

struct Watcher {
    id: u64,
    patient_id: String,
    kind: WatchKind,
    tx: mpsc::Sender<FeedEvent>,
}

const WATCH_CHANNEL_CAPACITY: usize = 16;

#[derive(Default)]
pub struct ChangeFeed {
    watchers: Vec<Watcher>,
    next_id: u64,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a patient's medication list. The current snapshot is
    /// delivered immediately; subsequent snapshots arrive on every publish.
    pub fn watch_medications(
        &mut self,
        conn: &Connection,
        patient_id: &str,
    ) -> Result<(WatchHandle, mpsc::Receiver<FeedEvent>), DatabaseError> {
        let snapshot = FeedEvent::Medications(get_medications_for_patient(conn, patient_id)?);
        Ok(self.add_watcher(patient_id, WatchKind::Medications, snapshot))
    }

    /// Subscribe to a patient's unread notifications.
    pub fn watch_unread_notifications(
        &mut self,
        conn: &Connection,
        patient_id: &str,
    ) -> Result<(WatchHandle, mpsc::Receiver<FeedEvent>), DatabaseError> {
        let snapshot = FeedEvent::Notifications(get_unread_for_patient(conn, patient_id)?);
        Ok(self.add_watcher(patient_id, WatchKind::UnreadNotifications, snapshot))
    }

    fn add_watcher(
        &mut self,
        patient_id: &str,
        kind: WatchKind,
        snapshot: FeedEvent,
    ) -> (WatchHandle, mpsc::Receiver<FeedEvent>) {
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        // Initial delivery cannot fail: the channel is empty and the
        // receiver has not been handed out yet.
        let _ = tx.try_send(snapshot);

        let id = self.next_id;
        self.next_id += 1;
        self.watchers.push(Watcher {
            id,
            patient_id: patient_id.to_string(),
            kind,
            tx,
        });
        (WatchHandle(id), rx)
    }

    /// Release a registration (screen-unmount teardown).
    pub fn unwatch(&mut self, handle: WatchHandle) {
        self.watchers.retain(|w| w.id != handle.0);
    }

    /// Number of live registrations.
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    /// Push a fresh medication snapshot to every watcher of this patient.
    pub fn publish_medications(
        &mut self,
        conn: &Connection,
        patient_id: &str,
    ) -> Result<(), DatabaseError> {
        if !self.has_watcher(patient_id, WatchKind::Medications) {
            return Ok(());
        }
        let snapshot = get_medications_for_patient(conn, patient_id)?;
        self.deliver(patient_id, WatchKind::Medications, || {
            FeedEvent::Medications(snapshot.clone())
        });
        Ok(())
    }

    /// Push a fresh unread-notification snapshot to every watcher of this
    /// patient.
    pub fn publish_notifications(
        &mut self,
        conn: &Connection,
        patient_id: &str,
    ) -> Result<(), DatabaseError> {
        if !self.has_watcher(patient_id, WatchKind::UnreadNotifications) {
            return Ok(());
        }
        let snapshot = get_unread_for_patient(conn, patient_id)?;
        self.deliver(patient_id, WatchKind::UnreadNotifications, || {
            FeedEvent::Notifications(snapshot.clone())
        });
        Ok(())
    }

    fn has_watcher(&self, patient_id: &str, kind: WatchKind) -> bool {
        self.watchers
            .iter()
            .any(|w| w.kind == kind && w.patient_id == patient_id)
    }

    /// Send to matching watchers. A full channel drops this snapshot (the
    /// next publish supersedes it); a closed receiver unregisters the
    /// watcher.
    fn deliver(&mut self, patient_id: &str, kind: WatchKind, make_event: impl Fn() -> FeedEvent) {
        let mut closed = Vec::new();
        for watcher in &self.watchers {
            if watcher.kind != kind || watcher.patient_id != patient_id {
                continue;
            }
            match watcher.tx.try_send(make_event()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(watcher = watcher.id, "Slow feed watcher, snapshot dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => closed.push(watcher.id),
            }
        }
        if !closed.is_empty() {
            self.watchers.retain(|w| !closed.contains(&w.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_medication, insert_notification};
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::NotificationType;
    use crate::models::{Medication, Notification, ScheduleSlot};
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn make_medication(patient_id: &str, name: &str) -> Medication {
        let mut schedules = BTreeMap::new();
        schedules.insert("morning".to_string(), ScheduleSlot::pending("08:00"));
        Medication {
            id: Uuid::new_v4(),
            patient_id: patient_id.into(),
            name: name.into(),
            dosage: "50mg".into(),
            frequency: "once daily".into(),
            supply_left: 8,
            schedules,
            last_updated: None,
        }
    }

    fn make_notification(patient_id: &str) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            notification_type: NotificationType::MedicationTaken,
            patient_id: patient_id.into(),
            patient_name: "Maria Cruz".into(),
            medication_id: Uuid::new_v4(),
            schedule_id: "morning".into(),
            timestamp: chrono::Local::now().naive_local(),
            read: false,
            message: "Maria Cruz has taken their medication".into(),
        }
    }

    #[test]
    fn watch_delivers_initial_snapshot() {
        let conn = open_memory_database().unwrap();
        insert_medication(&conn, &make_medication("PAT-ABC123", "Losartan")).unwrap();

        let mut feed = ChangeFeed::new();
        let (_handle, mut rx) = feed.watch_medications(&conn, "PAT-ABC123").unwrap();

        match rx.try_recv().unwrap() {
            FeedEvent::Medications(meds) => {
                assert_eq!(meds.len(), 1);
                assert_eq!(meds[0].name, "Losartan");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn publish_pushes_fresh_snapshot_to_matching_watchers_only() {
        let conn = open_memory_database().unwrap();
        let mut feed = ChangeFeed::new();

        let (_h1, mut rx1) = feed.watch_medications(&conn, "PAT-ABC123").unwrap();
        let (_h2, mut rx2) = feed.watch_medications(&conn, "PAT-OTHER1").unwrap();
        // Drain initial snapshots.
        rx1.try_recv().unwrap();
        rx2.try_recv().unwrap();

        insert_medication(&conn, &make_medication("PAT-ABC123", "Metformin")).unwrap();
        feed.publish_medications(&conn, "PAT-ABC123").unwrap();

        match rx1.try_recv().unwrap() {
            FeedEvent::Medications(meds) => assert_eq!(meds.len(), 1),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx2.try_recv().is_err(), "other patient saw the publish");
    }

    #[test]
    fn unwatch_stops_delivery() {
        let conn = open_memory_database().unwrap();
        let mut feed = ChangeFeed::new();

        let (handle, mut rx) = feed.watch_medications(&conn, "PAT-ABC123").unwrap();
        rx.try_recv().unwrap();
        assert_eq!(feed.watcher_count(), 1);

        feed.unwatch(handle);
        assert_eq!(feed.watcher_count(), 0);

        insert_medication(&conn, &make_medication("PAT-ABC123", "Metformin")).unwrap();
        feed.publish_medications(&conn, "PAT-ABC123").unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_is_pruned_on_publish() {
        let conn = open_memory_database().unwrap();
        let mut feed = ChangeFeed::new();

        let (_handle, rx) = feed.watch_medications(&conn, "PAT-ABC123").unwrap();
        drop(rx);
        assert_eq!(feed.watcher_count(), 1);

        insert_medication(&conn, &make_medication("PAT-ABC123", "Metformin")).unwrap();
        feed.publish_medications(&conn, "PAT-ABC123").unwrap();
        assert_eq!(feed.watcher_count(), 0);
    }

    #[test]
    fn notification_watch_sees_growing_unread_set() {
        let conn = open_memory_database().unwrap();
        let mut feed = ChangeFeed::new();

        let (_handle, mut rx) = feed.watch_unread_notifications(&conn, "PAT-ABC123").unwrap();
        match rx.try_recv().unwrap() {
            FeedEvent::Notifications(n) => assert!(n.is_empty()),
            other => panic!("unexpected event: {other:?}"),
        }

        insert_notification(&conn, &make_notification("PAT-ABC123")).unwrap();
        feed.publish_notifications(&conn, "PAT-ABC123").unwrap();

        match rx.try_recv().unwrap() {
            FeedEvent::Notifications(n) => assert_eq!(n.len(), 1),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}

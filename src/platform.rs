//! Narrow interfaces over opaque platform services.
//!
//! The host shell supplies real implementations backed by its notification
//! and speech engines; the crate only ever sees these traits.

use chrono::NaiveDateTime;

/// Fire-once local notification scheduling.
pub trait NotificationScheduler {
    fn schedule(&self, title: &str, body: &str, trigger: NaiveDateTime);
}

/// Fire-and-forget text-to-speech. Playback is asynchronous on the
/// platform side; no handle or completion signal comes back.
pub trait SpeechSynthesizer {
    fn speak(&self, text: &str);
}

/// Scheduler that only logs — for headless use.
pub struct LogNotifier;

impl NotificationScheduler for LogNotifier {
    fn schedule(&self, title: &str, body: &str, trigger: NaiveDateTime) {
        tracing::info!(%trigger, title, body, "Local notification scheduled");
    }
}

/// Speech synthesizer that only logs — for headless use.
pub struct LogSpeech;

impl SpeechSynthesizer for LogSpeech {
    fn speak(&self, text: &str) {
        tracing::info!(text, "Speaking");
    }
}

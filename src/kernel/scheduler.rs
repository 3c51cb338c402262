use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use super::cancel::CancellationRegistry;
use super::event::Announcement;
use super::time::{Clock, CLOCK_FORMAT};
use crate::error::ReminderError;
use crate::memory::{Reminder, ReminderKey, ReminderStore};

/// Parses a 12-hour clock label such as `"3:00 PM"` or `"11:45 am"`.
pub fn parse_time_label(label: &str) -> Result<NaiveTime, ReminderError> {
    let normalized = label.trim().to_uppercase();
    NaiveTime::parse_from_str(&normalized, CLOCK_FORMAT)
        .map_err(|_| ReminderError::InvalidTimeFormat(label.trim().to_string()))
}

/// Combines `time` with today's date, rolling forward one day if that instant has passed.
pub fn next_occurrence(now: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(time);
    if today < now {
        today + chrono::Duration::days(1)
    } else {
        today
    }
}

struct SchedulerState {
    store: ReminderStore,
    triggers: CancellationRegistry,
}

struct Inner {
    clock: Arc<dyn Clock>,
    state: Mutex<SchedulerState>,
    announcements: mpsc::Sender<Announcement>,
}

/// Owns the reminder store and one deferred trigger per live reminder.
///
/// All mutation (schedule, fire, cancel) and reads (list) go through a single
/// async mutex, so a firing trigger can never race a concurrent listing.
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct ReminderScheduler {
    inner: Arc<Inner>,
}

impl ReminderScheduler {
    /// Takes ownership of `store` and arms a trigger for every persisted reminder.
    /// Reminders that came due while the process was down fire immediately.
    pub async fn open(
        store: ReminderStore,
        clock: Arc<dyn Clock>,
        announcements: mpsc::Sender<Announcement>,
    ) -> Self {
        let scheduler = Self {
            inner: Arc::new(Inner {
                clock,
                state: Mutex::new(SchedulerState {
                    store,
                    triggers: CancellationRegistry::new(),
                }),
                announcements,
            }),
        };

        {
            let mut state = scheduler.inner.state.lock().await;
            let now = scheduler.inner.clock.now();
            let pending: Vec<Reminder> = state.store.all().to_vec();
            for reminder in &pending {
                if reminder.fire_time < now {
                    info!(text = %reminder.text, "Reminder came due while offline, firing now");
                }
                scheduler.arm(&mut state, reminder, now);
            }
            if !pending.is_empty() {
                info!(count = pending.len(), "Re-armed persisted reminders");
            }
        }

        scheduler
    }

    /// Parses `time_label`, persists a reminder for its next occurrence and arms its trigger.
    ///
    /// On a malformed label nothing is stored and no trigger is armed.
    pub async fn schedule(&self, text: &str, time_label: &str) -> Result<String, ReminderError> {
        let time = parse_time_label(time_label)?;
        let now = self.inner.clock.now();

        let reminder = Reminder {
            text: text.trim().to_string(),
            fire_time: next_occurrence(now, time),
            raw_time_label: time_label.trim().to_string(),
        };
        let confirmation = format!("Reminder set for {}", reminder.formatted_time());

        let mut state = self.inner.state.lock().await;
        if state.store.contains(&reminder.key()) {
            debug!(text = %reminder.text, "Identical reminder already pending");
            return Ok(confirmation);
        }

        state.store.push(reminder.clone());
        if let Err(e) = state.store.save() {
            warn!(error = %e, "Failed to persist reminders");
        }
        self.arm(&mut state, &reminder, now);

        info!(text = %reminder.text, fire_time = %reminder.fire_time, "Reminder scheduled");
        Ok(confirmation)
    }

    /// Human-readable listing of the live reminders at call time.
    pub async fn list(&self) -> String {
        let state = self.inner.state.lock().await;
        if state.store.is_empty() {
            return "No active reminders".to_string();
        }

        let mut out = String::from("Active reminders:\n");
        for reminder in state.store.all() {
            out.push_str(&format!("- {} at {}\n", reminder.text, reminder.formatted_time()));
        }
        out
    }

    /// Snapshot of the live reminders, in insertion order.
    pub async fn pending(&self) -> Vec<Reminder> {
        self.inner.state.lock().await.store.all().to_vec()
    }

    /// Cancels the pending reminder with this text whose fire time matches `time_label`.
    pub async fn cancel(&self, text: &str, time_label: &str) -> Result<bool, ReminderError> {
        let time = parse_time_label(time_label)?;
        let text = text.trim();

        let mut state = self.inner.state.lock().await;
        let key = state
            .store
            .all()
            .iter()
            .find(|r| r.text == text && r.fire_time.time() == time)
            .map(Reminder::key);

        let Some(key) = key else {
            return Ok(false);
        };

        state.triggers.cancel(&key);
        state.store.remove(&key);
        if let Err(e) = state.store.save() {
            warn!(error = %e, "Failed to persist reminders after cancel");
        }
        info!(text = %key.text, "Reminder cancelled");
        Ok(true)
    }

    /// Cancels every armed trigger without touching the store, so reminders survive a restart.
    pub async fn shutdown(&self) {
        self.inner.state.lock().await.triggers.cancel_all();
    }

    fn arm(&self, state: &mut SchedulerState, reminder: &Reminder, now: NaiveDateTime) {
        let key = reminder.key();
        let Some(token) = state.triggers.arm(key.clone()) else {
            return;
        };

        let delay = (reminder.fire_time - now).to_std().unwrap_or(Duration::ZERO);
        debug!(text = %key.text, delay_secs = delay.as_secs(), "Trigger armed");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(text = %key.text, "Trigger cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    inner.fire(key).await;
                }
            }
        });
    }
}

impl Inner {
    async fn fire(&self, key: ReminderKey) {
        {
            let mut state = self.state.lock().await;
            state.triggers.disarm(&key);
            if !state.store.remove(&key) {
                // Cancelled between the deadline and acquiring the lock.
                return;
            }
            if let Err(e) = state.store.save() {
                warn!(error = %e, "Failed to persist reminders after firing");
            }
        }

        info!(text = %key.text, "Reminder fired");
        if self
            .announcements
            .send(Announcement { text: key.text })
            .await
            .is_err()
        {
            warn!("Announcement channel closed, reminder not delivered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn parses_twelve_hour_labels() {
        assert_eq!(parse_time_label("3:00 PM").unwrap(), NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert_eq!(parse_time_label("5:00 pm").unwrap(), NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert_eq!(parse_time_label(" 12:30 am ").unwrap(), NaiveTime::from_hms_opt(0, 30, 0).unwrap());
    }

    #[test]
    fn rejects_non_times() {
        assert_eq!(
            parse_time_label("not a time"),
            Err(ReminderError::InvalidTimeFormat("not a time".to_string()))
        );
        assert!(parse_time_label("15:00").is_err());
        assert!(parse_time_label("").is_err());
    }

    #[test]
    fn next_occurrence_rolls_past_times() {
        let three_pm = NaiveTime::from_hms_opt(15, 0, 0).unwrap();
        assert_eq!(next_occurrence(at(14, 0), three_pm), at(15, 0));
        assert_eq!(next_occurrence(at(16, 0), three_pm), at(15, 0) + chrono::Duration::days(1));
        assert_eq!(next_occurrence(at(15, 0), three_pm), at(15, 0));
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::kernel::time::{CLOCK_FORMAT, DATE_FORMAT};

/// A pending reminder. Two reminders are the same reminder when text and fire time match.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub text: String,
    pub fire_time: NaiveDateTime,
    /// Time label as the user said it, e.g. "5:00 pm".
    pub raw_time_label: String,
}

impl PartialEq for Reminder {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.fire_time == other.fire_time
    }
}

impl Eq for Reminder {}

impl Reminder {
    pub fn key(&self) -> ReminderKey {
        ReminderKey {
            text: self.text.clone(),
            fire_time: self.fire_time,
        }
    }

    pub fn formatted_time(&self) -> String {
        self.fire_time.format(CLOCK_FORMAT).to_string()
    }
}

/// Structural identity of a reminder, used to address its trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    pub text: String,
    pub fire_time: NaiveDateTime,
}

/// On-disk shape: `{"text": ..., "time": "05:00 PM", "date": "2024-03-01"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReminderRecord {
    text: String,
    time: String,
    date: String,
}

impl From<&Reminder> for ReminderRecord {
    fn from(r: &Reminder) -> Self {
        Self {
            text: r.text.clone(),
            time: r.fire_time.format(CLOCK_FORMAT).to_string(),
            date: r.fire_time.format(DATE_FORMAT).to_string(),
        }
    }
}

impl ReminderRecord {
    fn into_reminder(self) -> Option<Reminder> {
        let time = NaiveTime::parse_from_str(&self.time, CLOCK_FORMAT).ok()?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()?;
        Some(Reminder {
            text: self.text,
            fire_time: date.and_time(time),
            raw_time_label: self.time,
        })
    }
}

/// Ordered, file-backed list of live reminders.
#[derive(Debug)]
pub struct ReminderStore {
    path: PathBuf,
    reminders: Vec<Reminder>,
}

impl ReminderStore {
    /// Opens the store. A missing or unparsable file yields an empty store;
    /// individual records with malformed time or date are skipped.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match Self::read(&path) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Reminder store unreadable, starting empty");
                Vec::new()
            }
        };

        let total = records.len();
        let reminders: Vec<Reminder> = records
            .into_iter()
            .filter_map(ReminderRecord::into_reminder)
            .collect();
        if reminders.len() != total {
            warn!(skipped = total - reminders.len(), "Dropped malformed reminder records");
        }
        debug!(path = %path.display(), reminders = reminders.len(), "Reminder store loaded");

        Self { path, reminders }
    }

    fn read(path: &Path) -> Result<Vec<ReminderRecord>, StoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn all(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    pub fn contains(&self, key: &ReminderKey) -> bool {
        self.reminders.iter().any(|r| r.key() == *key)
    }

    pub fn push(&mut self, reminder: Reminder) {
        self.reminders.push(reminder);
    }

    /// Removes every reminder structurally equal to `key`. Returns whether any was removed.
    pub fn remove(&mut self, key: &ReminderKey) -> bool {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.key() != *key);
        self.reminders.len() != before
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let records: Vec<ReminderRecord> = self.reminders.iter().map(ReminderRecord::from).collect();
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use common::at;
use jarvis::error::ReminderError;
use jarvis::kernel::event::Announcement;
use jarvis::kernel::scheduler::ReminderScheduler;
use jarvis::kernel::time::ManualClock;
use jarvis::memory::ReminderStore;
use tokio::sync::mpsc;

async fn scheduler_at(
    path: &Path,
    clock: Arc<ManualClock>,
) -> (ReminderScheduler, mpsc::Receiver<Announcement>) {
    let (tx, rx) = mpsc::channel(8);
    let scheduler = ReminderScheduler::open(ReminderStore::open(path), clock, tx).await;
    (scheduler, rx)
}

#[tokio::test(start_paused = true)]
async fn test_future_time_fires_same_day() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(at(14, 0, 0)));
    let (scheduler, _rx) = scheduler_at(&dir.path().join("r.json"), clock).await;

    let confirmation = scheduler.schedule("buy milk", "3:00 PM").await.unwrap();
    assert_eq!(confirmation, "Reminder set for 03:00 PM");

    let pending = scheduler.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].fire_time, at(15, 0, 0));
}

#[tokio::test(start_paused = true)]
async fn test_past_time_rolls_to_next_day() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(at(16, 0, 0)));
    let (scheduler, _rx) = scheduler_at(&dir.path().join("r.json"), clock).await;

    scheduler.schedule("buy milk", "3:00 PM").await.unwrap();

    let pending = scheduler.pending().await;
    assert_eq!(pending[0].fire_time, at(15, 0, 0) + ChronoDuration::days(1));
    assert!(pending[0].fire_time >= at(16, 0, 0), "Fire time never precedes creation");
}

#[tokio::test(start_paused = true)]
async fn test_malformed_time_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.json");
    let clock = Arc::new(ManualClock::new(at(9, 0, 0)));
    let (scheduler, mut rx) = scheduler_at(&path, clock).await;

    scheduler.schedule("stand up", "10:00 AM").await.unwrap();
    let before = scheduler.list().await;
    let file_before = fs::read_to_string(&path).unwrap();

    let err = scheduler.schedule("buy milk", "not a time").await.unwrap_err();
    assert_eq!(err, ReminderError::InvalidTimeFormat("not a time".to_string()));

    assert_eq!(scheduler.list().await, before);
    assert_eq!(fs::read_to_string(&path).unwrap(), file_before);

    // Only the valid reminder ever fires.
    let fired = rx.recv().await.unwrap();
    assert_eq!(fired.text, "stand up");
    let nothing_else = tokio::time::timeout(Duration::from_secs(48 * 3600), rx.recv()).await;
    assert!(nothing_else.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_fired_reminder_is_removed_and_announced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.json");
    let clock = Arc::new(ManualClock::new(at(14, 59, 0)));
    let (scheduler, mut rx) = scheduler_at(&path, clock).await;

    scheduler.schedule("buy milk", "3:00 PM").await.unwrap();
    assert!(scheduler.list().await.contains("- buy milk at 03:00 PM"));

    let announcement = rx.recv().await.expect("reminder should fire");
    assert_eq!(announcement.text, "buy milk");
    assert_eq!(announcement.sentence(), "Reminder: buy milk");

    assert_eq!(scheduler.list().await, "No active reminders");
    assert!(ReminderStore::open(&path).is_empty(), "Fired reminder must be gone from disk");
}

#[tokio::test(start_paused = true)]
async fn test_list_format_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(at(8, 0, 0)));
    let (scheduler, _rx) = scheduler_at(&dir.path().join("r.json"), clock).await;

    assert_eq!(scheduler.list().await, "No active reminders");

    scheduler.schedule("call mom", "5:00 PM").await.unwrap();
    scheduler.schedule("water plants", "9:30 am").await.unwrap();

    assert_eq!(
        scheduler.list().await,
        "Active reminders:\n- call mom at 05:00 PM\n- water plants at 09:30 AM\n"
    );
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_schedule_keeps_one_reminder() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(at(8, 0, 0)));
    let (scheduler, mut rx) = scheduler_at(&dir.path().join("r.json"), clock).await;

    scheduler.schedule("call mom", "5:00 PM").await.unwrap();
    scheduler.schedule("call mom", "5:00 pm").await.unwrap();
    assert_eq!(scheduler.pending().await.len(), 1);

    assert_eq!(rx.recv().await.unwrap().text, "call mom");
    let second = tokio::time::timeout(Duration::from_secs(48 * 3600), rx.recv()).await;
    assert!(second.is_err(), "Exactly one trigger per reminder");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_disarms_trigger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.json");
    let clock = Arc::new(ManualClock::new(at(8, 0, 0)));
    let (scheduler, mut rx) = scheduler_at(&path, clock).await;

    scheduler.schedule("call mom", "5:00 PM").await.unwrap();
    assert!(scheduler.cancel("call mom", "5:00 PM").await.unwrap());
    assert!(!scheduler.cancel("call mom", "5:00 PM").await.unwrap());

    assert_eq!(scheduler.list().await, "No active reminders");
    assert!(ReminderStore::open(&path).is_empty());

    let fired = tokio::time::timeout(Duration::from_secs(48 * 3600), rx.recv()).await;
    assert!(fired.is_err(), "Cancelled reminder must not fire");
}

#[tokio::test(start_paused = true)]
async fn test_persisted_reminders_are_rearmed_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.json");
    fs::write(
        &path,
        r#"[{"text":"take medicine","time":"06:00 PM","date":"2024-03-01"}]"#,
    )
    .unwrap();

    let clock = Arc::new(ManualClock::new(at(17, 0, 0)));
    let (scheduler, mut rx) = scheduler_at(&path, clock).await;
    assert_eq!(scheduler.pending().await.len(), 1);

    let fired = rx.recv().await.unwrap();
    assert_eq!(fired.text, "take medicine");
    assert!(ReminderStore::open(&path).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_overdue_reminders_fire_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.json");
    fs::write(
        &path,
        r#"[{"text":"missed call","time":"08:00 AM","date":"2024-03-01"}]"#,
    )
    .unwrap();

    let clock = Arc::new(ManualClock::new(at(12, 0, 0)));
    let (_scheduler, mut rx) = scheduler_at(&path, clock).await;

    let fired = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("overdue reminder fires without waiting")
        .unwrap();
    assert_eq!(fired.text, "missed call");
}

#[tokio::test(start_paused = true)]
async fn test_corrupt_reminder_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.json");
    fs::write(&path, "garbage").unwrap();

    let clock = Arc::new(ManualClock::new(at(12, 0, 0)));
    let (scheduler, _rx) = scheduler_at(&path, clock).await;
    assert_eq!(scheduler.list().await, "No active reminders");

    scheduler.schedule("recover", "1:00 PM").await.unwrap();
    assert_eq!(ReminderStore::open(&path).all().len(), 1);
}

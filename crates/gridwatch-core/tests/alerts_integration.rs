//! Integration tests for the alert scheduler against a real config file.
//!
//! These exercise the hot-reload path: the scheduler re-reads its config on
//! every tick, keeps the previous config when a reload fails, and never
//! re-fires a garbage-collected pair even if its lead times are edited back
//! into the file.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use gridwatch_core::{AlertScheduler, Event, EventType};

fn write_config(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
}

fn race(start: DateTime<Utc>) -> Event {
    Event::new(EventType::Race, "Silverstone", start, "British Grand Prix")
}

#[test]
fn first_config_load_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("alerts.toml");
    let start = Utc.with_ymd_and_hms(2026, 7, 5, 14, 0, 0).unwrap();
    assert!(AlertScheduler::new(vec![race(start)], &missing).is_err());
}

#[test]
fn reload_failure_keeps_previous_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("alerts.toml");
    write_config(&config_path, "[events]\nrace = [60, 15]\n");

    let start = Utc.with_ymd_and_hms(2026, 7, 5, 14, 0, 0).unwrap();
    let mut sched = AlertScheduler::new(vec![race(start)], &config_path).unwrap();

    // Tick 1: inside the 60-minute window.
    let fired = sched.tick(start - Duration::minutes(45));
    assert_eq!(
        fired.iter().map(|n| n.lead_time_min).collect::<Vec<_>>(),
        vec![60]
    );

    // Tick 2: the config file is now unreadable garbage; the lead-time list
    // from tick 1 must still apply.
    write_config(&config_path, "events = \"broken\"");
    let fired = sched.tick(start - Duration::minutes(14));
    assert_eq!(
        fired.iter().map(|n| n.lead_time_min).collect::<Vec<_>>(),
        vec![15]
    );
    assert_eq!(
        sched.config().lead_times_for(EventType::Race),
        Some(&[60, 15][..])
    );

    // Tick 3: a repaired file takes effect immediately.
    write_config(&config_path, "[events]\nrace = [5]\n");
    let fired = sched.tick(start - Duration::minutes(4));
    assert_eq!(
        fired.iter().map(|n| n.lead_time_min).collect::<Vec<_>>(),
        vec![5]
    );
    assert_eq!(
        sched.config().lead_times_for(EventType::Race),
        Some(&[5][..])
    );
}

#[test]
fn config_edits_between_ticks_change_lead_times() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("alerts.toml");
    write_config(&config_path, "[events]\nrace = [60]\n");

    let start = Utc.with_ymd_and_hms(2026, 7, 5, 14, 0, 0).unwrap();
    let mut sched = AlertScheduler::new(vec![race(start)], &config_path).unwrap();

    assert_eq!(sched.tick(start - Duration::minutes(45)).len(), 1);

    // A new lead time appears without a restart and fires on the next tick.
    write_config(&config_path, "[events]\nrace = [60, 30]\n");
    let fired = sched.tick(start - Duration::minutes(25));
    assert_eq!(
        fired.iter().map(|n| n.lead_time_min).collect::<Vec<_>>(),
        vec![30]
    );
}

#[test]
fn gc_then_config_edit_cannot_resurrect_an_alert() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("alerts.toml");
    write_config(&config_path, "[events]\nrace = [60, 15]\n");

    let t = Utc.with_ymd_and_hms(2026, 7, 5, 13, 10, 0).unwrap();
    let start = t + Duration::minutes(50);
    let mut sched = AlertScheduler::new(vec![race(start)], &config_path).unwrap();

    assert_eq!(sched.tick(t).len(), 1); // lead 60
    assert_eq!(sched.tick(t + Duration::minutes(40)).len(), 1); // lead 15

    // Past the start: GC clears both records.
    assert!(sched.tick(t + Duration::minutes(51)).is_empty());
    assert_eq!(sched.tracked_alerts(), 0);

    // Removing and re-adding the lead times must not produce another send;
    // the event is in the past and is skipped before the dedup set matters.
    write_config(&config_path, "[events]\n");
    assert!(sched.tick(t + Duration::minutes(52)).is_empty());
    write_config(&config_path, "[events]\nrace = [60, 15]\n");
    assert!(sched.tick(t + Duration::minutes(53)).is_empty());
    assert_eq!(sched.tracked_alerts(), 0);
}

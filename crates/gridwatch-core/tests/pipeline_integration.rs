//! End-to-end pipeline: calendar text -> storage -> scheduler -> payloads.

use chrono::{Duration, TimeZone, Utc};
use gridwatch_core::{
    convert_calendar, AlertScheduler, EventDb, EventFilter, EventType,
};
use std::fs;

const ICS: &str = "BEGIN:VCALENDAR\n\
VERSION:2.0\n\
PRODID:-//gridwatch tests//EN\n\
BEGIN:VEVENT\n\
UID:fp1@test\n\
SUMMARY:Test Practice 1\n\
CATEGORIES:F1,FP1\n\
DTSTART:20260703T113000Z\n\
LOCATION:Silverstone\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
UID:quali@test\n\
SUMMARY:Test Qualifying\n\
CATEGORIES:F1,Qualifying\n\
DTSTART:20260704T140000Z\n\
LOCATION:Silverstone\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
UID:race@test\n\
SUMMARY:Test Grand Prix - Race\n\
CATEGORIES:F1,Grand Prix\n\
DTSTART:20260705T140000Z\n\
LOCATION:Silverstone\n\
END:VEVENT\n\
END:VCALENDAR\n";

#[test]
fn calendar_flows_through_storage_into_alerts() {
    let dir = tempfile::tempdir().unwrap();
    let calendar_path = dir.path().join("calendar.ics");
    let db_path = dir.path().join("calendar.db");
    let config_path = dir.path().join("alerts.toml");

    fs::write(&calendar_path, ICS).unwrap();
    fs::write(&config_path, "[events]\nrace = [60]\nqualifying = [30]\n").unwrap();

    assert_eq!(convert_calendar(&calendar_path, &db_path).unwrap(), 3);

    // The bot's startup load: upcoming events from storage.
    let db = EventDb::open(&db_path).unwrap();
    let boot = Utc.with_ymd_and_hms(2026, 7, 3, 12, 0, 0).unwrap();
    let events = db.upcoming_events(EventFilter::Any, boot).unwrap();
    assert_eq!(events.len(), 2); // FP1 already underway is history

    let mut sched = AlertScheduler::new(events, &config_path).unwrap();

    // 40 minutes before qualifying: its 30-minute window is not open yet.
    let now = Utc.with_ymd_and_hms(2026, 7, 4, 13, 20, 0).unwrap();
    assert!(sched.tick(now).is_empty());

    // 25 minutes before: qualifying fires, race stays quiet.
    let now = Utc.with_ymd_and_hms(2026, 7, 4, 13, 35, 0).unwrap();
    let fired = sched.tick(now);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].title, "Qualifying starts in 30 minutes");
    assert_eq!(fired[0].location, "Silverstone");

    // Race day: the 60-minute alert fires exactly once.
    let now = Utc.with_ymd_and_hms(2026, 7, 5, 13, 10, 0).unwrap();
    let fired = sched.tick(now);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].title, "Grand Prix starts in 1 hour");
    assert!(sched.tick(now + Duration::minutes(1)).is_empty());

    // After the race everything is collected.
    assert!(sched
        .tick(Utc.with_ymd_and_hms(2026, 7, 5, 16, 0, 0).unwrap())
        .is_empty());
    assert_eq!(sched.tracked_alerts(), 0);

    // Query surface agrees with storage.
    let next = db
        .next_event(EventFilter::Race, boot)
        .unwrap()
        .unwrap();
    assert_eq!(next.event_type, EventType::Race);
    assert_eq!(next.to_string(), "Silverstone: Grand Prix: 2026/07/05 10:00:00");
}

//! The alert scheduler.
//!
//! A caller-driven polling core, no internal threads or timers: the bot loop
//! calls [`AlertScheduler::tick`] on a fixed interval (60 seconds in the
//! reference deployment) and delivers whatever comes back.
//!
//! Each tick:
//! 1. reloads the alert config (best effort -- the previous config is kept
//!    when the reload fails),
//! 2. evaluates every upcoming event against its configured lead times,
//! 3. garbage-collects dedup records for events that are now in the past.
//!
//! The dedup set holds `(lead_time, EventKey)` pairs and guarantees at most
//! one notification per pair for the process lifetime: a record is inserted
//! the moment a firing is decided -- before delivery -- so a failed send is
//! never retried. GC is the only mechanism that shrinks the set; without it
//! the set would grow by one record per configured lead time per event,
//! forever.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::alerts::dispatcher::{dispatch, Notification};
use crate::config::AlertConfig;
use crate::error::ConfigError;
use crate::event::{Event, EventKey};

/// Dedup marker: one lead time of one event.
pub type AlertKey = (i64, EventKey);

/// Polling alert scheduler.
///
/// Owns its event list, config, and dedup set; no ambient globals. The event
/// sequence is immutable between calendar refreshes, only read and compared.
pub struct AlertScheduler {
    events: Vec<Event>,
    config: AlertConfig,
    /// Config source re-read on every tick; `None` pins the current config.
    config_path: Option<PathBuf>,
    handled: HashSet<AlertKey>,
}

impl AlertScheduler {
    /// Create a scheduler that hot-reloads its config from `config_path`.
    ///
    /// # Errors
    /// Fails if the first config load fails -- a bot that never knew its
    /// lead times must not start. Later reload failures only log.
    pub fn new(events: Vec<Event>, config_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = config_path.into();
        let config = AlertConfig::load(&config_path)?;
        Ok(Self {
            events,
            config,
            config_path: Some(config_path),
            handled: HashSet::new(),
        })
    }

    /// Create a scheduler with a fixed config and no reload source.
    pub fn with_config(events: Vec<Event>, config: AlertConfig) -> Self {
        Self {
            events,
            config,
            config_path: None,
            handled: HashSet::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Number of live dedup records (bounded by GC).
    pub fn tracked_alerts(&self) -> usize {
        self.handled.len()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Swap in a freshly ingested event list after a calendar refresh.
    ///
    /// Dedup records key on event values, so an unchanged event keeps its
    /// already-sent markers across the swap.
    pub fn replace_events(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    /// One execution of the polling loop body.
    ///
    /// `now` is captured once by the caller and used for the whole tick,
    /// both the notify pass and garbage collection.
    ///
    /// Returns the notifications to deliver this tick. Their dedup records
    /// are already inserted: delivery failure does not re-arm a pair.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Notification> {
        self.reload_config();

        let mut fired = Vec::new();
        for idx in 0..self.events.len() {
            self.maybe_notify(idx, now, &mut fired);
        }
        self.garbage_collect(now);
        fired
    }

    /// Re-read the config source, keeping the previous config on failure.
    fn reload_config(&mut self) {
        let Some(path) = &self.config_path else {
            return;
        };
        match AlertConfig::load(path) {
            Ok(config) => self.config = config,
            Err(err) => {
                warn!("config reload failed, keeping previous config: {err}");
            }
        }
    }

    /// Evaluate one event against its configured lead times.
    ///
    /// For each lead time L, the firing condition is "waiting L minutes from
    /// now would overshoot the session start": `now + L > start`. Every
    /// configured lead time is independently eligible on the same tick -- an
    /// event entering its 60- and 30-minute windows between two ticks fires
    /// both at once.
    fn maybe_notify(&mut self, idx: usize, now: DateTime<Utc>, fired: &mut Vec<Notification>) {
        let event = &self.events[idx];
        if event.already_happened(now) {
            return;
        }
        let Some(lead_times) = self.config.lead_times_for(event.event_type) else {
            return;
        };

        let key = event.key();
        for &lead in lead_times {
            if self.handled.contains(&(lead, key)) {
                continue;
            }
            let alert_instant = now + Duration::minutes(lead);
            if alert_instant > event.start_eastern() {
                self.handled.insert((lead, key));
                debug!(lead, %event, "alert fired");
                fired.push(dispatch(event, lead));
            }
        }
    }

    /// Drop dedup records whose event has passed.
    ///
    /// Runs after the notify pass with the same `now`; a just-passed event
    /// was already skipped by `maybe_notify`, so its records cannot fire
    /// again before removal.
    fn garbage_collect(&mut self, now: DateTime<Utc>) {
        let past: HashSet<EventKey> = self
            .events
            .iter()
            .filter(|event| event.already_happened(now))
            .map(|event| event.key())
            .collect();
        self.handled.retain(|(_, key)| !past.contains(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn at(h: u32, mi: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2026, 7, 5)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
            .and_utc()
    }

    fn race_at(start: DateTime<Utc>) -> Event {
        Event::new(EventType::Race, "Silverstone", start, "British Grand Prix")
    }

    fn config(entries: &[(&str, &[i64])]) -> AlertConfig {
        let mut events = HashMap::new();
        for (key, leads) in entries {
            events.insert(key.to_string(), leads.to_vec());
        }
        AlertConfig { events }
    }

    #[test]
    fn fires_at_most_once_per_lead_time() {
        let start = at(14, 0);
        let mut sched =
            AlertScheduler::with_config(vec![race_at(start)], config(&[("race", &[60])]));

        // Event is 45 minutes out: inside the 60-minute window.
        let fired = sched.tick(at(13, 15));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].lead_time_min, 60);

        // Repeated ticks before the start never re-fire the pair.
        for minute in 16..59 {
            assert!(sched.tick(at(13, minute)).is_empty());
        }
        assert_eq!(sched.tracked_alerts(), 1);
    }

    #[test]
    fn event_outside_every_window_stays_silent() {
        let start = at(14, 0);
        let mut sched =
            AlertScheduler::with_config(vec![race_at(start)], config(&[("race", &[60, 15])]));
        // 90 minutes out: no window reached yet.
        assert!(sched.tick(at(12, 30)).is_empty());
        assert_eq!(sched.tracked_alerts(), 0);
    }

    #[test]
    fn lead_times_fire_independently_in_order() {
        let start = at(14, 0);
        let mut sched =
            AlertScheduler::with_config(vec![race_at(start)], config(&[("race", &[60, 30, 10])]));

        // 45 minutes out: only the 60-minute alert.
        let fired = sched.tick(at(13, 15));
        assert_eq!(
            fired.iter().map(|n| n.lead_time_min).collect::<Vec<_>>(),
            vec![60]
        );

        // 25 minutes out: only the 30-minute alert; 60 never double-fires.
        let fired = sched.tick(at(13, 35));
        assert_eq!(
            fired.iter().map(|n| n.lead_time_min).collect::<Vec<_>>(),
            vec![30]
        );

        // 5 minutes out: only the 10-minute alert.
        let fired = sched.tick(at(13, 55));
        assert_eq!(
            fired.iter().map(|n| n.lead_time_min).collect::<Vec<_>>(),
            vec![10]
        );
    }

    #[test]
    fn multiple_windows_entered_between_ticks_fire_together() {
        let start = at(14, 0);
        let mut sched =
            AlertScheduler::with_config(vec![race_at(start)], config(&[("race", &[60, 30])]));

        // First tick happens 25 minutes out: both windows already open.
        let fired = sched.tick(at(13, 35));
        assert_eq!(
            fired.iter().map(|n| n.lead_time_min).collect::<Vec<_>>(),
            vec![60, 30]
        );
    }

    #[test]
    fn past_events_never_fire() {
        let start = at(14, 0);
        let mut sched =
            AlertScheduler::with_config(vec![race_at(start)], config(&[("race", &[60])]));
        assert!(sched.tick(at(14, 1)).is_empty());
        assert_eq!(sched.tracked_alerts(), 0);
    }

    #[test]
    fn unconfigured_type_is_skipped() {
        let start = at(14, 0);
        let event = Event::new(EventType::Fp1, "Spa", start, "Practice 1");
        let mut sched = AlertScheduler::with_config(vec![event], config(&[("race", &[60])]));
        assert!(sched.tick(at(13, 30)).is_empty());
    }

    #[test]
    fn empty_lead_list_is_skipped() {
        let start = at(14, 0);
        let mut sched = AlertScheduler::with_config(vec![race_at(start)], config(&[("race", &[])]));
        assert!(sched.tick(at(13, 30)).is_empty());
    }

    #[test]
    fn duplicate_lead_times_fire_once() {
        let start = at(14, 0);
        let mut sched =
            AlertScheduler::with_config(vec![race_at(start)], config(&[("race", &[30, 30])]));
        let fired = sched.tick(at(13, 45));
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn gc_removes_records_once_event_passed() {
        let start = at(14, 0);
        let mut sched =
            AlertScheduler::with_config(vec![race_at(start)], config(&[("race", &[60, 15])]));

        sched.tick(at(13, 15)); // fires 60
        sched.tick(at(13, 50)); // fires 15
        assert_eq!(sched.tracked_alerts(), 2);

        // One tick past the start: GC drops both records, nothing fires.
        assert!(sched.tick(at(14, 1)).is_empty());
        assert_eq!(sched.tracked_alerts(), 0);

        // And the event stays silent afterwards.
        assert!(sched.tick(at(14, 2)).is_empty());
    }

    #[test]
    fn gc_only_touches_past_events() {
        let early = race_at(at(14, 0));
        let late = Event::new(EventType::Qualifying, "Spa", at(18, 0), "Qualifying");
        let mut sched = AlertScheduler::with_config(
            vec![early, late],
            config(&[("race", &[30]), ("qualifying", &[300])]),
        );

        let fired = sched.tick(at(13, 45));
        assert_eq!(fired.len(), 2);
        assert_eq!(sched.tracked_alerts(), 2);

        // Race has passed, qualifying has not: only the race record goes.
        sched.tick(at(14, 30));
        assert_eq!(sched.tracked_alerts(), 1);
    }

    #[test]
    fn end_to_end_t_plus_fifty_scenario() {
        // Event starts at T+50min with lead times [60, 15].
        let t = at(13, 10);
        let start = at(14, 0);
        let mut sched =
            AlertScheduler::with_config(vec![race_at(start)], config(&[("race", &[60, 15])]));

        let fired = sched.tick(t);
        assert_eq!(
            fired.iter().map(|n| n.lead_time_min).collect::<Vec<_>>(),
            vec![60]
        );

        let fired = sched.tick(t + Duration::minutes(40));
        assert_eq!(
            fired.iter().map(|n| n.lead_time_min).collect::<Vec<_>>(),
            vec![15]
        );

        let fired = sched.tick(t + Duration::minutes(51));
        assert!(fired.is_empty());
        assert_eq!(sched.tracked_alerts(), 0);
    }

    #[test]
    fn replace_events_keeps_markers_for_unchanged_events() {
        let start = at(14, 0);
        let event = race_at(start);
        let mut sched =
            AlertScheduler::with_config(vec![event.clone()], config(&[("race", &[60])]));

        assert_eq!(sched.tick(at(13, 15)).len(), 1);

        // Same event value arrives again from a calendar refresh.
        sched.replace_events(vec![event]);
        assert!(sched.tick(at(13, 20)).is_empty());
    }

    #[test]
    fn payloads_carry_event_fields() {
        let start = at(14, 0);
        let mut sched =
            AlertScheduler::with_config(vec![race_at(start)], config(&[("race", &[60])]));
        let fired = sched.tick(at(13, 15));
        assert_eq!(fired[0].title, "Grand Prix starts in 1 hour");
        assert_eq!(fired[0].location, "Silverstone");
    }
}

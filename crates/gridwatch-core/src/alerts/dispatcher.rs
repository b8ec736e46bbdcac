//! Firing decision -> outbound notification payload.
//!
//! Pure formatting; no I/O. The payload carries everything a sink needs to
//! render the message without reaching back into the event model.

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Display payload for one fired alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// "{event label} starts in {duration}"
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_label: String,
    /// Session start rendered in the reference zone.
    pub local_time: String,
    pub lead_time_min: i64,
}

/// Build the notification payload for an event firing at a given lead time.
pub fn dispatch(event: &Event, lead_time_min: i64) -> Notification {
    Notification {
        title: format!(
            "{} starts in {}",
            event.event_type.label(),
            normalize_duration(lead_time_min)
        ),
        description: event.description.clone(),
        location: event.location.clone(),
        event_label: event.event_type.label().to_string(),
        local_time: event.time_str(),
        lead_time_min,
    }
}

/// Render minutes as "{H} hour(s) {M} minute(s)".
///
/// The hour segment is omitted when zero, the minute segment when no minutes
/// remain after extracting whole hours. Zero minutes renders as the empty
/// string.
pub fn normalize_duration(minutes: i64) -> String {
    let hours = minutes / 60;
    let minutes = minutes - hours * 60;
    let mut parts = Vec::with_capacity(2);

    match hours {
        0 => {}
        1 => parts.push("1 hour".to_string()),
        n => parts.push(format!("{n} hours")),
    }
    match minutes {
        0 => {}
        1 => parts.push("1 minute".to_string()),
        n => parts.push(format!("{n} minutes")),
    }
    parts.join(" ")
}

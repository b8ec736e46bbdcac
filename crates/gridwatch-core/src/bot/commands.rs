//! Free-text command dispatch.
//!
//! The query surface of the bot: `ping`, `next [type]`, `calendar [type]`,
//! `standings <driver|constructor>`. Handlers only read shared state -- the
//! event list and the standings cache -- and never touch scheduler state.

use chrono::{DateTime, Utc};

use crate::event::{Event, EventFilter};
use crate::standings::StandingsCache;

/// Chat platforms cap message length; listings are trimmed to fit.
pub const MAX_MESSAGE_LEN: usize = 2000;

const TRIM_MARKER: &str = "[message too long, trimmed to fit]";

/// A parsed command string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Next(EventFilter),
    Calendar(EventFilter),
    Standings(StandingsKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsKind {
    Driver,
    Constructor,
}

impl Command {
    /// Parse a free-text command. `None` for anything unrecognized.
    pub fn parse(input: &str) -> Option<Command> {
        let mut words = input.split_whitespace();
        let head = words.next()?.to_ascii_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return None;
        }

        match (head.as_str(), arg) {
            ("ping", None) => Some(Command::Ping),
            ("next", None) => Some(Command::Next(EventFilter::Any)),
            ("next", Some(filter)) => EventFilter::parse(filter).map(Command::Next),
            ("calendar", None) => Some(Command::Calendar(EventFilter::Any)),
            ("calendar", Some(filter)) => EventFilter::parse(filter).map(Command::Calendar),
            ("standings", None) => Some(Command::Standings(StandingsKind::Driver)),
            ("standings", Some(kind)) => match kind.to_ascii_lowercase().as_str() {
                "driver" | "drivers" => Some(Command::Standings(StandingsKind::Driver)),
                "constructor" | "constructors" => {
                    Some(Command::Standings(StandingsKind::Constructor))
                }
                _ => None,
            },
            _ => None,
        }
    }
}

/// Produce the response text for a command.
pub fn respond(
    command: Command,
    events: &[Event],
    standings: &StandingsCache,
    now: DateTime<Utc>,
) -> String {
    match command {
        Command::Ping => "pong".to_string(),
        Command::Next(filter) => next_response(filter, events, now),
        Command::Calendar(filter) => calendar_response(filter, events, now),
        Command::Standings(kind) => standings_response(kind, standings),
    }
}

fn no_events_message(filter: EventFilter) -> String {
    match filter {
        EventFilter::Any => "No events left on calendar".to_string(),
        _ => format!("No {}'s left on the calendar", filter.label()),
    }
}

fn next_response(filter: EventFilter, events: &[Event], now: DateTime<Utc>) -> String {
    let next = events
        .iter()
        .filter(|event| !event.already_happened(now))
        .find(|event| filter.matches(event.event_type));
    match next {
        Some(event) => format!("Next {}\n{event}", event.event_type.label()),
        None => no_events_message(filter),
    }
}

fn calendar_response(filter: EventFilter, events: &[Event], now: DateTime<Utc>) -> String {
    let lines: Vec<String> = events
        .iter()
        .filter(|event| !event.already_happened(now))
        .filter(|event| filter.matches(event.event_type))
        .map(|event| event.to_string())
        .collect();

    if lines.is_empty() {
        return no_events_message(filter);
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut total = 0;
    for line in &lines {
        if total + line.len() + 1 > MAX_MESSAGE_LEN {
            kept.pop();
            kept.push(TRIM_MARKER);
            break;
        }
        kept.push(line);
        total += line.len() + 1;
    }
    format!("```\n{}```", kept.join("\n"))
}

fn standings_response(kind: StandingsKind, standings: &StandingsCache) -> String {
    let text = match kind {
        StandingsKind::Driver => standings.driver_text(),
        StandingsKind::Constructor => standings.constructor_text(),
    };
    match text {
        Some(text) => format!("```\n{text}```"),
        None => "Standings are not available right now".to_string(),
    }
}

//! # Gridwatch Core Library
//!
//! Core business logic for gridwatch, a Formula 1 calendar alert bot. The
//! CLI binary is a thin layer over this crate: it wires the polling loop,
//! delivery, and the query commands together, while everything with real
//! invariants lives here.
//!
//! ## Architecture
//!
//! - **Alert Scheduler**: a caller-driven polling core -- `tick(now)` is
//!   invoked on a fixed interval, re-evaluates every upcoming session
//!   against the hot-reloaded alert config, and returns the notifications
//!   to deliver, at most once per (event, lead-time) pair
//! - **Event Model**: timezone-normalized session events with value
//!   identity; all comparisons go through one reference zone
//! - **Calendar**: iCalendar ingestion and the daily feed refresh
//! - **Storage**: SQLite copy of the ingested calendar for query surfaces
//! - **Bot surface**: free-text command dispatch and Discord webhook
//!   delivery
//!
//! ## Key Components
//!
//! - [`AlertScheduler`]: the dedup-tracked polling core
//! - [`AlertConfig`]: per-session-type lead times, reloaded every tick
//! - [`Event`]: one session on the calendar
//! - [`DiscordSink`]: webhook delivery
//! - [`EventDb`]: calendar storage

pub mod alerts;
pub mod bot;
pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod standings;
pub mod storage;
pub mod table;

pub use alerts::{dispatch, normalize_duration, AlertScheduler, Notification};
pub use bot::{respond, Command, DiscordSink, StandingsKind};
pub use calendar::{load_events, parse_events, CalendarRefresher, DEFAULT_CALENDAR_URL};
pub use config::AlertConfig;
pub use error::{
    CalendarError, ConfigError, CoreError, DatabaseError, DeliveryError, StandingsError,
};
pub use event::{Event, EventFilter, EventKey, EventType, REFERENCE_ZONE};
pub use standings::{ConstructorStandings, DriverStandings, StandingsCache, StandingsClient};
pub use storage::{convert_calendar, data_dir, EventDb};
pub use table::Table;

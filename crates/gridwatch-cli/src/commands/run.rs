//! The bot loop.
//!
//! One cooperative task multiplexing four inputs: the 60-second alert tick,
//! the daily calendar refresh, the hourly standings refresh, and a
//! line-based command intake on stdin. Only one branch runs at a time, so a
//! full tick (config reload included) is never interleaved with command
//! handling. A failure in any branch is logged and never stops the loop.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info, warn};

use gridwatch_core::bot::commands::{respond, Command};
use gridwatch_core::{
    AlertScheduler, CalendarRefresher, DiscordSink, EventDb, EventFilter, StandingsCache,
    StandingsClient, DEFAULT_CALENDAR_URL,
};

/// How often, in seconds, to check whether alerts should be sent.
const ALERT_INTERVAL_SECS: u64 = 60;
/// How often to re-download the calendar feed.
const CALENDAR_INTERVAL_SECS: u64 = 24 * 60 * 60;
/// How often to refresh the standings cache.
const STANDINGS_INTERVAL_SECS: u64 = 60 * 60;

#[derive(Args)]
pub struct RunArgs {
    /// Events database (defaults to ~/.config/gridwatch/calendar.db)
    #[arg(long)]
    db: Option<PathBuf>,
    /// Alert config file (defaults to ~/.config/gridwatch/alerts.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Discord webhook URL (defaults to the stored credential)
    #[arg(long)]
    webhook_url: Option<String>,
    /// Calendar feed URL
    #[arg(long, default_value = DEFAULT_CALENDAR_URL)]
    calendar_url: String,
    /// Local copy of the downloaded feed
    #[arg(long)]
    calendar_file: Option<PathBuf>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    super::runtime()?.block_on(run_bot(args))
}

async fn run_bot(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let db_path = super::db_path(args.db)?;
    let config_path = super::config_path(args.config)?;
    let calendar_file = super::calendar_file(args.calendar_file)?;

    let db = EventDb::open(&db_path)?;
    let events = db.upcoming_events(EventFilter::Any, Utc::now())?;
    info!(count = events.len(), "tracking upcoming events");

    // First config load is fatal; later reload failures only warn.
    let mut scheduler = AlertScheduler::new(events, &config_path)?;

    let sink = match args.webhook_url {
        Some(url) => DiscordSink::with_webhook_url(url),
        None => DiscordSink::new(),
    };
    if !sink.is_configured() {
        warn!("no webhook configured; alerts will be logged, not delivered");
    }

    let refresher = CalendarRefresher::new(args.calendar_url, &calendar_file, &db_path);
    let standings_client = StandingsClient::new();
    let mut standings_cache = StandingsCache::default();

    let mut alert_tick = tokio::time::interval(Duration::from_secs(ALERT_INTERVAL_SECS));
    let mut calendar_tick = tokio::time::interval(Duration::from_secs(CALENDAR_INTERVAL_SECS));
    let mut standings_tick = tokio::time::interval(Duration::from_secs(STANDINGS_INTERVAL_SECS));

    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    info!("gridwatch running");
    loop {
        tokio::select! {
            _ = alert_tick.tick() => {
                let now = Utc::now();
                for notification in scheduler.tick(now) {
                    info!(title = %notification.title, "alert fired");
                    if !sink.is_configured() {
                        continue;
                    }
                    // No retry: the dedup record is already inserted.
                    if let Err(err) = sink.send(&notification).await {
                        error!("delivery failed: {err}");
                    }
                }
            }
            _ = calendar_tick.tick() => {
                match refresher.refresh().await {
                    Ok(true) => match db.upcoming_events(EventFilter::Any, Utc::now()) {
                        Ok(events) => {
                            info!(count = events.len(), "calendar changed, event list reloaded");
                            scheduler.replace_events(events);
                        }
                        Err(err) => error!("event reload after refresh failed: {err}"),
                    },
                    Ok(false) => {}
                    Err(err) => warn!("calendar refresh failed: {err}"),
                }
            }
            _ = standings_tick.tick() => {
                if let Err(err) = standings_cache.refresh(&standings_client, super::season_year()).await {
                    warn!("standings refresh failed: {err}");
                }
            }
            line = stdin.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => match Command::parse(&line) {
                        Some(command) => {
                            println!("{}", respond(command, scheduler.events(), &standings_cache, Utc::now()));
                        }
                        None => println!("unknown command: {}", line.trim()),
                    },
                    Ok(None) | Err(_) => {
                        // stdin closed; keep the bot running without the
                        // command surface.
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }
    Ok(())
}

//! Championship standings retrieval and formatting.
//!
//! Thin client over the Ergast API. Driver standings come straight from the
//! season endpoint; constructor standings are aggregated from driver points
//! per team. Responses render as monospace tables for chat output.
//!
//! The bot keeps a [`StandingsCache`] refreshed on its own interval so
//! command responses never block on the upstream API.

use serde::Deserialize;

use crate::error::StandingsError;
use crate::table::Table;

/// Season standings endpoint root.
pub const ERGAST_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

/// One classified driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    pub number: String,
    pub first_name: String,
    pub last_name: String,
    pub team: String,
    pub points: i64,
}

/// Season driver standings.
#[derive(Debug, Clone, Default)]
pub struct DriverStandings {
    pub drivers: Vec<Driver>,
}

impl DriverStandings {
    /// Render as a Place/Name/Team/Points table, highest points first.
    pub fn to_text(&self) -> String {
        let mut drivers = self.drivers.clone();
        drivers.sort_by_key(|driver| std::cmp::Reverse(driver.points));

        let mut tbl = Table::new(&["Place", "Name", "Team", "Points"]);
        for (idx, driver) in drivers.iter().enumerate() {
            tbl.add_row(vec![
                (idx + 1).to_string(),
                driver.last_name.clone(),
                driver.team.clone(),
                driver.points.to_string(),
            ]);
        }
        tbl.output()
    }
}

/// Season constructor standings, aggregated from driver points.
#[derive(Debug, Clone, Default)]
pub struct ConstructorStandings {
    /// (team, points), unsorted.
    pub teams: Vec<(String, i64)>,
}

impl ConstructorStandings {
    pub fn from_driver_standings(standings: &DriverStandings) -> Self {
        let mut teams: Vec<(String, i64)> = Vec::new();
        for driver in &standings.drivers {
            match teams.iter_mut().find(|(team, _)| *team == driver.team) {
                Some((_, points)) => *points += driver.points,
                None => teams.push((driver.team.clone(), driver.points)),
            }
        }
        Self { teams }
    }

    /// Render as a Place/Team/Points table, highest points first.
    pub fn to_text(&self) -> String {
        let mut teams = self.teams.clone();
        teams.sort_by_key(|(_, points)| std::cmp::Reverse(*points));

        let mut tbl = Table::new(&["Place", "Team", "Points"]);
        for (idx, (team, points)) in teams.iter().enumerate() {
            tbl.add_row(vec![(idx + 1).to_string(), team.clone(), points.to_string()]);
        }
        tbl.output()
    }
}

/// Ergast standings client.
pub struct StandingsClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for StandingsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StandingsClient {
    pub fn new() -> Self {
        Self::with_base_url(ERGAST_BASE_URL)
    }

    /// Point the client at a different endpoint root (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the driver standings for a season.
    pub async fn driver_standings(&self, year: i32) -> Result<DriverStandings, StandingsError> {
        let url = format!("{}/{}/driverStandings.json", self.base_url, year);
        let response: ErgastResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        DriverStandings::try_from(response)
    }

    /// Fetch and aggregate the constructor standings for a season.
    pub async fn constructor_standings(
        &self,
        year: i32,
    ) -> Result<ConstructorStandings, StandingsError> {
        let drivers = self.driver_standings(year).await?;
        Ok(ConstructorStandings::from_driver_standings(&drivers))
    }
}

/// Pre-rendered standings text, refreshed on the bot's standings interval.
#[derive(Debug, Clone, Default)]
pub struct StandingsCache {
    driver_text: Option<String>,
    constructor_text: Option<String>,
}

impl StandingsCache {
    /// Re-fetch both tables. On failure the previous text is kept.
    pub async fn refresh(
        &mut self,
        client: &StandingsClient,
        year: i32,
    ) -> Result<(), StandingsError> {
        let drivers = client.driver_standings(year).await?;
        self.constructor_text =
            Some(ConstructorStandings::from_driver_standings(&drivers).to_text());
        self.driver_text = Some(drivers.to_text());
        Ok(())
    }

    pub fn driver_text(&self) -> Option<&str> {
        self.driver_text.as_deref()
    }

    pub fn constructor_text(&self) -> Option<&str> {
        self.constructor_text.as_deref()
    }
}

// ── Ergast wire format ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ErgastResponse {
    #[serde(rename = "MRData")]
    mr_data: MrData,
}

#[derive(Debug, Deserialize)]
struct MrData {
    #[serde(rename = "StandingsTable")]
    standings_table: StandingsTable,
}

#[derive(Debug, Deserialize)]
struct StandingsTable {
    #[serde(rename = "StandingsLists", default)]
    standings_lists: Vec<StandingsList>,
}

#[derive(Debug, Deserialize)]
struct StandingsList {
    #[serde(rename = "DriverStandings", default)]
    driver_standings: Vec<DriverStandingEntry>,
}

#[derive(Debug, Deserialize)]
struct DriverStandingEntry {
    points: String,
    #[serde(rename = "Driver")]
    driver: ErgastDriver,
    #[serde(rename = "Constructors", default)]
    constructors: Vec<ErgastConstructor>,
}

#[derive(Debug, Deserialize)]
struct ErgastDriver {
    #[serde(rename = "permanentNumber", default)]
    permanent_number: Option<String>,
    #[serde(rename = "givenName")]
    given_name: String,
    #[serde(rename = "familyName")]
    family_name: String,
}

#[derive(Debug, Deserialize)]
struct ErgastConstructor {
    name: String,
}

impl TryFrom<ErgastResponse> for DriverStandings {
    type Error = StandingsError;

    fn try_from(response: ErgastResponse) -> Result<Self, StandingsError> {
        let list = response
            .mr_data
            .standings_table
            .standings_lists
            .into_iter()
            .next()
            .ok_or_else(|| {
                StandingsError::UnexpectedResponse("no standings list for season".to_string())
            })?;

        let mut drivers = Vec::with_capacity(list.driver_standings.len());
        for entry in list.driver_standings {
            let points = entry.points.parse::<i64>().map_err(|_| {
                StandingsError::UnexpectedResponse(format!("bad points value '{}'", entry.points))
            })?;
            let team = entry
                .constructors
                .first()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            drivers.push(Driver {
                number: entry.driver.permanent_number.unwrap_or_default(),
                first_name: entry.driver.given_name,
                last_name: entry.driver.family_name,
                team,
                points,
            });
        }
        Ok(DriverStandings { drivers })
    }
}

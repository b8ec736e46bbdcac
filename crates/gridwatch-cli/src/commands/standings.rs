use std::error::Error;

use clap::{Args, ValueEnum};
use gridwatch_core::StandingsClient;

#[derive(Args)]
pub struct StandingsArgs {
    /// Which championship table to show
    #[arg(value_enum, default_value = "driver")]
    kind: Kind,
    /// Season year (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Kind {
    Driver,
    Constructor,
}

pub fn run(args: StandingsArgs) -> Result<(), Box<dyn Error>> {
    let year = args.year.unwrap_or_else(super::season_year);
    let client = StandingsClient::new();

    let text = super::runtime()?.block_on(async {
        match args.kind {
            Kind::Driver => client.driver_standings(year).await.map(|s| s.to_text()),
            Kind::Constructor => client
                .constructor_standings(year)
                .await
                .map(|s| s.to_text()),
        }
    })?;

    println!("{text}");
    Ok(())
}

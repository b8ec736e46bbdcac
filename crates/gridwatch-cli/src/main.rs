use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "gridwatch", version, about = "Formula 1 calendar alert bot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the alert bot
    Run(commands::run::RunArgs),
    /// Show the next upcoming session
    Next(commands::next::NextArgs),
    /// List upcoming sessions
    Calendar(commands::calendar::CalendarArgs),
    /// Championship standings
    Standings(commands::standings::StandingsArgs),
    /// Dispatch one command string the way the chat surface would
    Chat(commands::chat::ChatArgs),
    /// Convert a calendar file into the events database
    Convert(commands::convert::ConvertArgs),
    /// Webhook credential management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Next(args) => commands::next::run(args),
        Commands::Calendar(args) => commands::calendar::run(args),
        Commands::Standings(args) => commands::standings::run(args),
        Commands::Chat(args) => commands::chat::run(args),
        Commands::Convert(args) => commands::convert::run(args),
        Commands::Auth { action } => commands::auth::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

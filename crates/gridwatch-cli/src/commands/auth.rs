use std::error::Error;

use clap::Subcommand;
use gridwatch_core::DiscordSink;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Discord webhook: login / logout / status
    Discord {
        #[command(subcommand)]
        action: AuthOp,
    },
}

#[derive(Subcommand)]
pub enum AuthOp {
    /// Store the webhook URL in the OS keyring
    Login {
        #[arg(long)]
        webhook_url: String,
    },
    /// Remove the stored credential
    Logout,
    /// Check whether a webhook is configured
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn Error>> {
    match action {
        AuthAction::Discord { action } => handle_discord(action),
    }
}

fn handle_discord(op: AuthOp) -> Result<(), Box<dyn Error>> {
    match op {
        AuthOp::Login { webhook_url } => {
            let mut sink = DiscordSink::new();
            sink.set_credentials(&webhook_url)?;
            sink.validate()?;
            println!("Discord webhook configured");
        }
        AuthOp::Logout => {
            let mut sink = DiscordSink::new();
            sink.disconnect()?;
            println!("Discord webhook removed");
        }
        AuthOp::Status => {
            let sink = DiscordSink::new();
            println!(
                "{}",
                if sink.is_configured() {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }
    }
    Ok(())
}

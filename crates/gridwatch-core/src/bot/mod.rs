//! Chat-facing surface: command dispatch and webhook delivery.

pub mod commands;
pub mod discord;

pub use commands::{respond, Command, StandingsKind, MAX_MESSAGE_LEN};
pub use discord::DiscordSink;

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::DeliveryError;

    const SERVICE: &str = "gridwatch";

    pub fn get(key: &str) -> Result<Option<String>, DeliveryError> {
        let entry = keyring::Entry::new(SERVICE, key)
            .map_err(|e| DeliveryError::Credentials(e.to_string()))?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(DeliveryError::Credentials(e.to_string())),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), DeliveryError> {
        let entry = keyring::Entry::new(SERVICE, key)
            .map_err(|e| DeliveryError::Credentials(e.to_string()))?;
        entry
            .set_password(value)
            .map_err(|e| DeliveryError::Credentials(e.to_string()))
    }

    pub fn delete(key: &str) -> Result<(), DeliveryError> {
        let entry = keyring::Entry::new(SERVICE, key)
            .map_err(|e| DeliveryError::Credentials(e.to_string()))?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(DeliveryError::Credentials(e.to_string())),
        }
    }
}

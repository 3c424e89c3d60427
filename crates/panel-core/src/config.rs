use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Longest SSID allowed by 802.11
pub const MAX_SSID_LEN: usize = 32;
/// Longest WPA2 passphrase
pub const MAX_PASSWORD_LEN: usize = 64;

pub const DEFAULT_PORT: u16 = 80;
pub const JOYSTICK_CONNECT_TIMEOUT_MS: u32 = 30_000;
pub const THERMOMETER_CONNECT_TIMEOUT_MS: u32 = 20_000;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SSID longer than 32 bytes")]
    SsidTooLong,
    #[error("password longer than 64 bytes")]
    PasswordTooLong,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub internet: InternetConfig,
    pub server: ServerConfig,
}

impl Config {
    pub fn new(internet: InternetConfig) -> Self {
        Self {
            internet,
            server: ServerConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct InternetConfig {
    pub ssid: heapless::String<MAX_SSID_LEN>,
    pub password: heapless::String<MAX_PASSWORD_LEN>,
    pub connect_timeout_ms: u32,
}

impl InternetConfig {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config
            .ssid
            .push_str(ssid)
            .map_err(|_| ConfigError::SsidTooLong)?;
        config
            .password
            .push_str(password)
            .map_err(|_| ConfigError::PasswordTooLong)?;
        Ok(config)
    }

    pub fn with_connect_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }
}

impl Default for InternetConfig {
    fn default() -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            connect_timeout_ms: JOYSTICK_CONNECT_TIMEOUT_MS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port the page is served on, any local address
    pub port: u16,
    /// Drop a connection that stays silent this long. `None` waits forever.
    pub socket_timeout_ms: Option<u32>,
    /// Connection attempts before startup gives up. One means no retry.
    pub startup_attempts: u8,
    /// Pause between startup attempts
    pub retry_delay_ms: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            socket_timeout_ms: Some(10_000),
            startup_attempts: 1,
            retry_delay_ms: 5_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 80);
        assert_eq!(config.server.startup_attempts, 1);
        assert_eq!(config.internet.connect_timeout_ms, 30_000);
        assert!(config.internet.ssid.is_empty());
    }

    #[test]
    fn test_credentials() {
        let internet = InternetConfig::new("Labirang", "secret")
            .unwrap()
            .with_connect_timeout_ms(THERMOMETER_CONNECT_TIMEOUT_MS);
        assert_eq!(internet.ssid.as_str(), "Labirang");
        assert_eq!(internet.password.as_str(), "secret");
        assert_eq!(internet.connect_timeout_ms, 20_000);
    }

    #[test]
    fn test_credential_overflow() {
        let long = "x".repeat(MAX_SSID_LEN + 1);
        assert_eq!(InternetConfig::new(&long, ""), Err(ConfigError::SsidTooLong));

        let long = "x".repeat(MAX_PASSWORD_LEN + 1);
        assert_eq!(InternetConfig::new("ssid", &long), Err(ConfigError::PasswordTooLong));

        let exact = "x".repeat(MAX_SSID_LEN);
        assert!(InternetConfig::new(&exact, "").is_ok());
    }
}

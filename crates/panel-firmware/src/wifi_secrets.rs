//! Wi-Fi credentials injected by `build.rs`

use panel_core::config::{ConfigError, InternetConfig};

pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");

/// Station credentials with the given connect timeout
pub fn internet_config(connect_timeout_ms: u32) -> Result<InternetConfig, ConfigError> {
    Ok(InternetConfig::new(WIFI_SSID, WIFI_PASSWORD)?.with_connect_timeout_ms(connect_timeout_ms))
}

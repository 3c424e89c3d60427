//! ESP32-S3 firmware-specific modules for the sensor panel
//!
//! This crate contains hardware-specific code that cannot compile on desktop
//! targets: ADC and GPIO sensor backends, Wi-Fi association and the
//! `embassy-net` listener.

#![no_std]

pub mod hardware;
pub mod net;
pub mod wifi;
pub mod wifi_secrets;

use embassy_time::Timer;
use panel_core::app_state::AppError;

/// Stop after a fatal startup error. The executor keeps running so RTT
/// output stays readable.
pub async fn park(error: AppError) -> ! {
    log::error!("Giving up: {}", error);
    loop {
        Timer::after_secs(60).await;
    }
}

//! Sensor capability traits and typed readings
//!
//! Hardware backends (ADC channels, GPIO buttons) live in the firmware crate;
//! the simulator and tests provide synthetic ones. The page renderers only
//! ever see these traits.

mod readings;

pub use readings::*;

use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor}: failed to {operation}")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
    },
    #[error("{sensor}: no sample within {timeout_ms} ms")]
    Timeout {
        sensor: &'static str,
        timeout_ms: u32,
    },
}

/// Trait for sensors that produce typed readings.
pub trait Sensor {
    /// The type of readings this sensor produces.
    type Reading;

    /// Sample the sensor. Called once per request, never cached.
    fn read(&mut self) -> impl Future<Output = Result<Self::Reading, SensorError>>;
}

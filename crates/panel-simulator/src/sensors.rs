//! Synthetic sensor backends
//!
//! Readings vary with wall-clock time so the auto-refreshing page visibly
//! changes. Buttons are driven from stdin by the input thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use panel_core::sensors::{
    ADC_MAX, ButtonLevels, JoystickReading, Sensor, SensorError, TemperatureReading,
};
use panel_core::temperature::TEMPERATURE_SETTLE_MS;

/// Seconds for the stick to sweep one full circle
const SWEEP_PERIOD_SECS: f64 = 16.0;

/// Raw count near the 27 °C calibration point
const TEMPERATURE_BASE_RAW: f64 = 876.0;

/// Buttons held down from stdin, `a` then `b`
pub static HELD: [AtomicBool; 2] = [AtomicBool::new(false), AtomicBool::new(false)];

/// Stick that rests in the centre for a quarter of each period and sweeps a
/// circle through all eight outer zones for the rest.
pub struct SimulatedJoystick {
    started: Instant,
}

impl SimulatedJoystick {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn reading_at(elapsed: Duration) -> JoystickReading {
        let phase = (elapsed.as_secs_f64() % SWEEP_PERIOD_SECS) / SWEEP_PERIOD_SECS;
        if phase < 0.25 {
            return JoystickReading { x: 2048, y: 2048 };
        }

        let angle = (phase - 0.25) / 0.75 * core::f64::consts::TAU;
        let axis = |v: f64| (2048.0 + 2000.0 * v).clamp(0.0, ADC_MAX as f64) as u16;
        JoystickReading {
            x: axis(angle.cos()),
            y: axis(angle.sin()),
        }
    }
}

impl Default for SimulatedJoystick {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for SimulatedJoystick {
    type Reading = JoystickReading;

    async fn read(&mut self) -> Result<JoystickReading, SensorError> {
        Ok(Self::reading_at(self.started.elapsed()))
    }
}

/// Buttons whose levels mirror [`HELD`]
pub struct SimulatedButtons;

impl Sensor for SimulatedButtons {
    type Reading = ButtonLevels;

    async fn read(&mut self) -> Result<ButtonLevels, SensorError> {
        Ok(ButtonLevels {
            a: HELD[0].load(Ordering::Relaxed),
            b: HELD[1].load(Ordering::Relaxed),
        })
    }
}

/// Temperature channel drifting a few degrees around 27 °C
pub struct SimulatedThermometer {
    started: Instant,
}

impl SimulatedThermometer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn raw_at(elapsed: Duration) -> u16 {
        let t = elapsed.as_secs_f64();
        (TEMPERATURE_BASE_RAW + 8.0 * (t / 30.0).sin() + 2.0 * (t / 7.0).cos()) as u16
    }
}

impl Default for SimulatedThermometer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for SimulatedThermometer {
    type Reading = TemperatureReading;

    async fn read(&mut self) -> Result<TemperatureReading, SensorError> {
        // Same settle time the hardware channel needs
        std::thread::sleep(Duration::from_millis(TEMPERATURE_SETTLE_MS));
        Ok(TemperatureReading {
            raw: Self::raw_at(self.started.elapsed()),
        })
    }
}

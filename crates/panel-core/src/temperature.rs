//! Temperature sensor channel conversion
//!
//! The sensor outputs 0.706 V at 27 °C with a slope of -1.721 mV/°C. Raw
//! counts come from a 12-bit ADC referenced to 3.3 V.

/// ADC reference voltage in volts
pub const ADC_VREF: f32 = 3.3;

/// Number of ADC steps (12 bits)
pub const ADC_STEPS: f32 = 4096.0;

/// Sensor voltage at the 27 °C calibration point
const CALIBRATION_VOLTS: f32 = 0.706;
const CALIBRATION_CELSIUS: f32 = 27.0;
const VOLTS_PER_DEGREE: f32 = 0.001721;

/// Delay between selecting the temperature channel and sampling it.
pub const TEMPERATURE_SETTLE_MS: u64 = 100;

/// Convert a raw ADC count into degrees Celsius.
///
/// No range checking is done: counts the sensor can never produce still map
/// onto the same line (0 → ~437.23 °C, 4095 → ~-1479.80 °C).
pub fn raw_to_celsius(raw: u16) -> f32 {
    let volts = raw as f32 * ADC_VREF / ADC_STEPS;
    CALIBRATION_CELSIUS - (volts - CALIBRATION_VOLTS) / VOLTS_PER_DEGREE
}

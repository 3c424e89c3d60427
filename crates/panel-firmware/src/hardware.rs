//! ADC and GPIO backends for the panel sensors
//!
//! Wiring (ESP32-S3):
//! - GPIO1 / ADC1: joystick X axis
//! - GPIO2 / ADC1: joystick Y axis
//! - GPIO3 / ADC1: temperature sensor output
//! - GPIO5, GPIO6: buttons A and B to ground, internal pull-ups

use embassy_time::{Duration, Instant, Timer};
use esp_hal::Blocking;
use esp_hal::analog::adc::{Adc, AdcChannel, AdcConfig, AdcPin, Attenuation};
use esp_hal::gpio::{Input, InputConfig, InputPin, Pull};
use esp_hal::peripherals::{ADC1, GPIO1, GPIO2, GPIO3};
use log::{debug, info, trace};

use panel_core::latch::ButtonLatch;
use panel_core::sensors::{
    ButtonLevels, JoystickReading, Sensor, SensorError, TemperatureReading,
};
use panel_core::temperature::TEMPERATURE_SETTLE_MS;

/// A 12-bit one-shot conversion finishes in microseconds; past this the
/// channel is considered stuck.
const ADC_CONVERSION_TIMEOUT_MS: u32 = 5;

type Adc1 = Adc<'static, ADC1<'static>, Blocking>;

/// Run one blocking conversion on `pin`.
fn read_channel<PIN>(
    adc: &mut Adc1,
    pin: &mut AdcPin<PIN, ADC1<'static>>,
    sensor: &'static str,
) -> Result<u16, SensorError>
where
    PIN: AdcChannel,
{
    let deadline = Instant::now() + Duration::from_millis(ADC_CONVERSION_TIMEOUT_MS as u64);
    loop {
        match adc.read_oneshot(pin) {
            Ok(raw) => return Ok(raw),
            Err(nb::Error::WouldBlock) if Instant::now() < deadline => {}
            Err(nb::Error::WouldBlock) => {
                return Err(SensorError::Timeout {
                    sensor,
                    timeout_ms: ADC_CONVERSION_TIMEOUT_MS,
                });
            }
            Err(nb::Error::Other(_)) => {
                return Err(SensorError::ReadFailed {
                    sensor,
                    operation: "convert",
                });
            }
        }
    }
}

/// Input with the internal pull-up enabled, so an idle button reads high.
pub fn button_input(pin: impl InputPin + 'static) -> Input<'static> {
    Input::new(pin, InputConfig::default().with_pull(Pull::Up))
}

/// Two-axis analog joystick on ADC1
pub struct AdcJoystick {
    adc: Adc1,
    x: AdcPin<GPIO1<'static>, ADC1<'static>>,
    y: AdcPin<GPIO2<'static>, ADC1<'static>>,
}

impl AdcJoystick {
    pub fn new(adc1: ADC1<'static>, x: GPIO1<'static>, y: GPIO2<'static>) -> Self {
        let mut config = AdcConfig::new();
        let x = config.enable_pin(x, Attenuation::_11dB);
        let y = config.enable_pin(y, Attenuation::_11dB);
        info!("Joystick on ADC1: X=GPIO1 Y=GPIO2");
        Self {
            adc: Adc::new(adc1, config),
            x,
            y,
        }
    }
}

impl Sensor for AdcJoystick {
    type Reading = JoystickReading;

    async fn read(&mut self) -> Result<JoystickReading, SensorError> {
        let x = read_channel(&mut self.adc, &mut self.x, "joystick X")?;
        let y = read_channel(&mut self.adc, &mut self.y, "joystick Y")?;
        trace!("joystick raw x={} y={}", x, y);
        Ok(JoystickReading { x, y })
    }
}

/// Analog temperature sensor on ADC1
pub struct AdcThermometer {
    adc: Adc1,
    pin: AdcPin<GPIO3<'static>, ADC1<'static>>,
}

impl AdcThermometer {
    pub fn new(adc1: ADC1<'static>, pin: GPIO3<'static>) -> Self {
        let mut config = AdcConfig::new();
        let pin = config.enable_pin(pin, Attenuation::_11dB);
        info!("Temperature sensor on ADC1: GPIO3");
        Self {
            adc: Adc::new(adc1, config),
            pin,
        }
    }
}

impl Sensor for AdcThermometer {
    type Reading = TemperatureReading;

    async fn read(&mut self) -> Result<TemperatureReading, SensorError> {
        // Let the sampling capacitor settle on the sensor voltage
        Timer::after_millis(TEMPERATURE_SETTLE_MS).await;
        let raw = read_channel(&mut self.adc, &mut self.pin, "temperature")?;
        Ok(TemperatureReading { raw })
    }
}

/// Buttons sampled as levels at request time
pub struct GpioButtons {
    a: Input<'static>,
    b: Input<'static>,
}

impl GpioButtons {
    pub fn new(a: Input<'static>, b: Input<'static>) -> Self {
        Self { a, b }
    }
}

impl Sensor for GpioButtons {
    type Reading = ButtonLevels;

    async fn read(&mut self) -> Result<ButtonLevels, SensorError> {
        Ok(ButtonLevels::from_active_low(self.a.is_high(), self.b.is_high()))
    }
}

/// Latch a press on every falling edge of `input`.
///
/// The GPIO interrupt wakes this task; it only signals the latch and goes
/// back to waiting.
#[embassy_executor::task(pool_size = 2)]
pub async fn button_edge_task(
    mut input: Input<'static>,
    latch: &'static ButtonLatch,
    name: &'static str,
) {
    info!("Watching button {}", name);
    loop {
        input.wait_for_falling_edge().await;
        if latch.is_set() {
            debug!("button {} pressed again before the page was read", name);
        }
        latch.press();
        trace!("button {} pressed", name);
    }
}

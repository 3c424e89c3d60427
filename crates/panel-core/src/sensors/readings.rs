use crate::direction::Direction;
use crate::temperature::raw_to_celsius;

/// Largest value a 12-bit ADC channel can report
pub const ADC_MAX: u16 = 4095;

/// Raw joystick axes, each 0..=4095 with rest near 2048.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickReading {
    pub x: u16,
    pub y: u16,
}

impl JoystickReading {
    pub const fn direction(&self) -> Direction {
        Direction::classify(self.x, self.y)
    }
}

/// Raw count from the temperature sensor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureReading {
    pub raw: u16,
}

impl TemperatureReading {
    pub fn celsius(&self) -> f32 {
        raw_to_celsius(self.raw)
    }
}

/// Button states sampled at request time, `true` meaning pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonLevels {
    pub a: bool,
    pub b: bool,
}

impl ButtonLevels {
    /// Build from raw pin levels of active-low buttons wired with pull-ups:
    /// a high pin is at rest, a low pin is pressed.
    pub const fn from_active_low(a_high: bool, b_high: bool) -> Self {
        Self {
            a: !a_high,
            b: !b_high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_low() {
        assert_eq!(
            ButtonLevels::from_active_low(true, true),
            ButtonLevels { a: false, b: false }
        );
        assert_eq!(
            ButtonLevels::from_active_low(false, true),
            ButtonLevels { a: true, b: false }
        );
    }

    #[test]
    fn test_reading_helpers() {
        let stick = JoystickReading { x: 2048, y: ADC_MAX };
        assert_eq!(stick.direction(), Direction::North);

        let temp = TemperatureReading { raw: 0 };
        assert!(temp.celsius() > 437.0);
    }
}

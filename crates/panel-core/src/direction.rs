//! Joystick direction classification
//!
//! Maps a pair of 12-bit ADC readings onto one of nine zones around the
//! mid-scale centre. Offsets inside the dead zone count as no deflection.

/// Mid-scale value of a 12-bit ADC, the resting position of each axis.
pub const AXIS_CENTER: i32 = 2048;

/// Offset from [`AXIS_CENTER`] that an axis must exceed to count as deflected.
pub const DEAD_ZONE: i32 = 1000;

/// Zone the joystick is pointing at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Center,
    East,
    West,
    North,
    South,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    /// An axis sits exactly on the dead-zone boundary.
    Unrecognized,
}

impl Direction {
    /// Classify a raw `(x, y)` reading.
    ///
    /// Checks run in a fixed order (centre, cardinals, diagonals) and the
    /// first match wins. All comparisons are strict, so an offset of exactly
    /// [`DEAD_ZONE`] on either axis falls through to [`Direction::Unrecognized`].
    pub const fn classify(x: u16, y: u16) -> Self {
        let dx = x as i32 - AXIS_CENTER;
        let dy = y as i32 - AXIS_CENTER;
        let x_rest = dx.abs() < DEAD_ZONE;
        let y_rest = dy.abs() < DEAD_ZONE;

        if x_rest && y_rest {
            Self::Center
        } else if dx > DEAD_ZONE && y_rest {
            Self::East
        } else if dx < -DEAD_ZONE && y_rest {
            Self::West
        } else if dy > DEAD_ZONE && x_rest {
            Self::North
        } else if dy < -DEAD_ZONE && x_rest {
            Self::South
        } else if dx > DEAD_ZONE && dy > DEAD_ZONE {
            Self::NorthEast
        } else if dx < -DEAD_ZONE && dy > DEAD_ZONE {
            Self::NorthWest
        } else if dx > DEAD_ZONE && dy < -DEAD_ZONE {
            Self::SouthEast
        } else if dx < -DEAD_ZONE && dy < -DEAD_ZONE {
            Self::SouthWest
        } else {
            Self::Unrecognized
        }
    }

    /// Label shown on the panel page
    pub const fn label(self) -> &'static str {
        match self {
            Self::Center => "Centro",
            Self::East => "Leste",
            Self::West => "Oeste",
            Self::North => "Norte",
            Self::South => "Sul",
            Self::NorthEast => "Nordeste",
            Self::NorthWest => "Noroeste",
            Self::SouthEast => "Sudeste",
            Self::SouthWest => "Sudoeste",
            Self::Unrecognized => "Nao identificado",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: u16 = AXIS_CENTER as u16;

    #[test]
    fn test_center_inside_dead_zone() {
        for x in (C - 999..=C + 999).step_by(37) {
            for y in (C - 999..=C + 999).step_by(41) {
                assert_eq!(Direction::classify(x, y), Direction::Center, "({x}, {y})");
            }
        }
        assert_eq!(Direction::classify(C - 999, C + 999), Direction::Center);
    }

    #[test]
    fn test_cardinals() {
        assert_eq!(Direction::classify(C + 1001, C), Direction::East);
        assert_eq!(Direction::classify(4095, C + 999), Direction::East);
        assert_eq!(Direction::classify(C - 1001, C), Direction::West);
        assert_eq!(Direction::classify(0, C - 999), Direction::West);
        assert_eq!(Direction::classify(C, C + 1001), Direction::North);
        assert_eq!(Direction::classify(C - 999, 4095), Direction::North);
        assert_eq!(Direction::classify(C, C - 1001), Direction::South);
        assert_eq!(Direction::classify(C + 999, 0), Direction::South);
    }

    #[test]
    fn test_diagonals_need_both_axes_deflected() {
        assert_eq!(Direction::classify(4095, 4095), Direction::NorthEast);
        assert_eq!(Direction::classify(0, 4095), Direction::NorthWest);
        assert_eq!(Direction::classify(4095, 0), Direction::SouthEast);
        assert_eq!(Direction::classify(0, 0), Direction::SouthWest);
        assert_eq!(Direction::classify(C + 1001, C + 1001), Direction::NorthEast);
        assert_eq!(Direction::classify(C - 1001, C - 1001), Direction::SouthWest);
    }

    #[test]
    fn test_boundary_is_unrecognized() {
        assert_eq!(Direction::classify(C + 1000, C), Direction::Unrecognized);
        assert_eq!(Direction::classify(C - 1000, C), Direction::Unrecognized);
        assert_eq!(Direction::classify(C, C + 1000), Direction::Unrecognized);
        assert_eq!(Direction::classify(C, C - 1000), Direction::Unrecognized);
        assert_eq!(Direction::classify(C + 1000, C + 1000), Direction::Unrecognized);
        // A boundary on one axis also blocks the diagonals
        assert_eq!(Direction::classify(4095, C + 1000), Direction::Unrecognized);
        assert_eq!(Direction::classify(C - 1000, 0), Direction::Unrecognized);
    }

    #[test]
    fn test_total_over_adc_range() {
        for x in (0..=4095u16).step_by(64) {
            for y in (0..=4095u16).step_by(64) {
                let label = Direction::classify(x, y).label();
                assert!(!label.is_empty());
            }
        }
        assert_eq!(Direction::classify(u16::MAX, u16::MAX), Direction::NorthEast);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Direction::Center.label(), "Centro");
        assert_eq!(Direction::SouthWest.label(), "Sudoeste");
        assert_eq!(Direction::Unrecognized.label(), "Nao identificado");
    }
}

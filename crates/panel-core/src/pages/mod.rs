//! Panel pages
//!
//! Each page samples its sensors and renders a complete HTTP/1.1 response
//! (status line, headers, blank line, HTML body) into a fixed-capacity
//! buffer. Formatting is capacity-checked: a response that would not fit is
//! reported as [`PageError::ResponseTooLarge`] and the buffer is left empty.

mod joystick;
mod thermometer;

pub use joystick::JoystickPage;
pub use thermometer::{StatusMessage, ThermometerPage};

use core::fmt::{self, Write};

use thiserror_no_std::Error;

use crate::sensors::SensorError;

/// Size of the response buffer. Every rendered page must fit in one write.
pub const RESPONSE_CAPACITY: usize = 1024;

/// Buffer holding one complete HTTP response
pub type Response = heapless::String<RESPONSE_CAPACITY>;

/// Milliseconds between browser reloads, embedded in every page script.
pub const REFRESH_MS: u32 = 1000;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("response does not fit in {capacity} bytes")]
    ResponseTooLarge { capacity: usize },
    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),
}

/// Something that can answer a request with a freshly sampled page.
pub trait PageSource {
    /// Sample the hardware and render the full response into `out`.
    fn render(&mut self, out: &mut Response) -> impl Future<Output = Result<(), PageError>>;
}

/// Replace the contents of `out` with the formatted response.
pub(crate) fn write_response(out: &mut Response, args: fmt::Arguments<'_>) -> Result<(), PageError> {
    out.clear();
    out.write_fmt(args).map_err(|_| {
        out.clear();
        PageError::ResponseTooLarge {
            capacity: RESPONSE_CAPACITY,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_is_reported() {
        let mut out = Response::new();
        let filler = [b'x'; RESPONSE_CAPACITY];
        let filler = core::str::from_utf8(&filler).unwrap();

        assert_eq!(write_response(&mut out, format_args!("{filler}")), Ok(()));
        assert_eq!(out.len(), RESPONSE_CAPACITY);

        let result = write_response(&mut out, format_args!("{filler}!"));
        assert_eq!(
            result,
            Err(PageError::ResponseTooLarge {
                capacity: RESPONSE_CAPACITY
            })
        );
        assert!(out.is_empty(), "a truncated response must never be sent");
    }
}

use log::debug;

use super::{PageError, PageSource, REFRESH_MS, Response, write_response};
use crate::latch::{ButtonLatches, Presses};
use crate::sensors::{Sensor, TemperatureReading};

/// Status line shown above the temperature, built from the consumed latches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    Idle,
    PressedA,
    PressedB,
    PressedBoth,
}

impl StatusMessage {
    pub const fn from_presses(presses: Presses) -> Self {
        match (presses.a, presses.b) {
            (false, false) => Self::Idle,
            (true, false) => Self::PressedA,
            (false, true) => Self::PressedB,
            (true, true) => Self::PressedBoth,
        }
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::Idle => "Pressione um botão",
            Self::PressedA => "Botão A pressionado!",
            Self::PressedB => "Botão B pressionado!",
            Self::PressedBoth => "Botões A e B pressionados!",
        }
    }
}

/// Temperature monitor with a press-reporting status line.
///
/// Each render consumes the pending presses, so a press shows up on exactly
/// one page load.
pub struct ThermometerPage<'a, T> {
    sensor: T,
    latches: &'a ButtonLatches,
}

impl<'a, T> ThermometerPage<'a, T>
where
    T: Sensor<Reading = TemperatureReading>,
{
    pub fn new(sensor: T, latches: &'a ButtonLatches) -> Self {
        Self { sensor, latches }
    }
}

impl<T> PageSource for ThermometerPage<'_, T>
where
    T: Sensor<Reading = TemperatureReading>,
{
    async fn render(&mut self, out: &mut Response) -> Result<(), PageError> {
        let reading = self.sensor.read().await?;
        let celsius = reading.celsius();
        let status = StatusMessage::from_presses(self.latches.take());

        debug!("temperature raw={} -> {} C, {:?}", reading.raw, celsius, status);

        write_response(
            out,
            format_args!(
                "HTTP/1.1 200 OK\r\n\
                 Content-Type: text/html\r\n\r\n\
                 <!DOCTYPE html>\
                 <html><head><meta charset=\"UTF-8\"><title>Temperatura</title>\
                 <script>setInterval(() => location.reload(), {refresh});</script>\
                 <style>\
                 body{{font-family:sans-serif;text-align:center;padding-top:40px}}\
                 h1{{font-size:26px}}\
                 .temp{{font-size:40px;font-weight:bold;margin:20px 0}}\
                 .status{{font-size:20px;margin:10px}}\
                 </style></head><body>\
                 <h1>Monitor de Temperatura</h1>\
                 <div class=\"temp\">{celsius:.2} &deg;C</div>\
                 <div class=\"status\">{status}</div>\
                 <p style=\"font-size:14px;\">Atualiza automaticamente a cada 1 segundo.</p>\
                 </body></html>",
                refresh = REFRESH_MS,
                celsius = celsius,
                status = status.text(),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorError;
    use embassy_futures::block_on;

    struct FixedTemp(u16);

    impl Sensor for FixedTemp {
        type Reading = TemperatureReading;

        async fn read(&mut self) -> Result<TemperatureReading, SensorError> {
            Ok(TemperatureReading { raw: self.0 })
        }
    }

    fn render(page: &mut ThermometerPage<'_, FixedTemp>) -> Response {
        let mut out = Response::new();
        block_on(page.render(&mut out)).unwrap();
        out
    }

    #[test]
    fn test_headers_and_temperature() {
        let latches = ButtonLatches::new();
        let mut page = ThermometerPage::new(FixedTemp(0), &latches);
        let out = render(&mut page);

        assert!(out.starts_with("HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n"));
        assert!(out.contains("setInterval(() => location.reload(), 1000)"));
        assert!(out.contains("437.2"));
        assert!(out.contains("Pressione um botão"));
    }

    #[test]
    fn test_press_reported_once() {
        let latches = ButtonLatches::new();
        let mut page = ThermometerPage::new(FixedTemp(876), &latches);

        latches.a.press();
        let first = render(&mut page);
        assert!(first.contains("Botão A pressionado!"));

        let second = render(&mut page);
        assert!(second.contains("Pressione um botão"));
        assert!(!second.contains("pressionado!"));
    }

    #[test]
    fn test_both_presses() {
        let latches = ButtonLatches::new();
        let mut page = ThermometerPage::new(FixedTemp(876), &latches);

        latches.b.press();
        assert!(render(&mut page).contains("Botão B pressionado!"));

        latches.a.press();
        latches.b.press();
        assert!(render(&mut page).contains("Botões A e B pressionados!"));
        assert!(!latches.a.is_set() && !latches.b.is_set());
    }

    #[test]
    fn test_extreme_raw_fits() {
        let latches = ButtonLatches::new();
        latches.a.press();
        latches.b.press();
        let mut page = ThermometerPage::new(FixedTemp(u16::MAX), &latches);
        let out = render(&mut page);
        assert!(out.len() <= crate::pages::RESPONSE_CAPACITY);
        assert!(out.contains("-30"));
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            StatusMessage::from_presses(Presses { a: true, b: false }),
            StatusMessage::PressedA
        );
        assert_eq!(StatusMessage::from_presses(Presses::default()).text(), "Pressione um botão");
    }
}

use log::debug;

use super::{PageError, PageSource, REFRESH_MS, Response, write_response};
use crate::sensors::{ButtonLevels, JoystickReading, Sensor};

const PRESSED: &str = "Pressionado";
const RELEASED: &str = "Nao pressionado";

/// Control panel showing the joystick axes, its zone and both buttons.
pub struct JoystickPage<J, B> {
    joystick: J,
    buttons: B,
}

impl<J, B> JoystickPage<J, B>
where
    J: Sensor<Reading = JoystickReading>,
    B: Sensor<Reading = ButtonLevels>,
{
    pub fn new(joystick: J, buttons: B) -> Self {
        Self { joystick, buttons }
    }
}

impl<J, B> PageSource for JoystickPage<J, B>
where
    J: Sensor<Reading = JoystickReading>,
    B: Sensor<Reading = ButtonLevels>,
{
    async fn render(&mut self, out: &mut Response) -> Result<(), PageError> {
        let stick = self.joystick.read().await?;
        let buttons = self.buttons.read().await?;
        let direction = stick.direction();

        debug!(
            "joystick x={} y={} -> {:?}, buttons a={} b={}",
            stick.x, stick.y, direction, buttons.a, buttons.b
        );

        write_response(
            out,
            format_args!(
                "HTTP/1.1 200 OK\r\n\
                 Content-Type: text/html; charset=UTF-8\r\n\r\n\
                 <!DOCTYPE html>\
                 <html><head><meta charset=\"UTF-8\">\
                 <script>setTimeout(() => location.reload(), {refresh});</script>\
                 <style>\
                 body{{font-family:sans-serif;text-align:center;padding-top:40px}}\
                 h2{{font-size:24px}}\
                 .info{{font-size:20px;margin-top:10px}}\
                 .direcao{{font-size:22px;font-weight:bold;margin:20px 0}}\
                 .botao{{margin:8px;font-size:18px}}\
                 </style></head><body>\
                 <h2>Painel de Controle</h2>\
                 <div class=\"info\">Eixo X : {x}</div>\
                 <div class=\"info\">Eixo Y : {y}</div>\
                 <div class=\"direcao\">Local: {direction}</div>\
                 <div class=\"botao\">Botão A: {a}</div>\
                 <div class=\"botao\">Botão B: {b}</div>\
                 <p style=\"font-size:14px;\">Atualiza automaticamente a cada 1 segundo.</p>\
                 </body></html>",
                refresh = REFRESH_MS,
                x = stick.x,
                y = stick.y,
                direction = direction.label(),
                a = if buttons.a { PRESSED } else { RELEASED },
                b = if buttons.b { PRESSED } else { RELEASED },
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{ADC_MAX, SensorError};
    use embassy_futures::block_on;

    struct FixedStick(JoystickReading);

    impl Sensor for FixedStick {
        type Reading = JoystickReading;

        async fn read(&mut self) -> Result<JoystickReading, SensorError> {
            Ok(self.0)
        }
    }

    struct FixedButtons(ButtonLevels);

    impl Sensor for FixedButtons {
        type Reading = ButtonLevels;

        async fn read(&mut self) -> Result<ButtonLevels, SensorError> {
            Ok(self.0)
        }
    }

    struct BrokenStick;

    impl Sensor for BrokenStick {
        type Reading = JoystickReading;

        async fn read(&mut self) -> Result<JoystickReading, SensorError> {
            Err(SensorError::ReadFailed {
                sensor: "joystick",
                operation: "read X axis",
            })
        }
    }

    fn render(x: u16, y: u16, a: bool, b: bool) -> Response {
        let mut page = JoystickPage::new(
            FixedStick(JoystickReading { x, y }),
            FixedButtons(ButtonLevels { a, b }),
        );
        let mut out = Response::new();
        block_on(page.render(&mut out)).unwrap();
        out
    }

    #[test]
    fn test_centered_with_button_a() {
        let out = render(2048, 2048, true, false);

        assert!(out.starts_with("HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n"));
        assert!(out.contains("Eixo X : 2048"));
        assert!(out.contains("Eixo Y : 2048"));
        assert!(out.contains("Local: Centro"));
        assert!(out.contains("Botão A: Pressionado"));
        assert!(out.contains("Botão B: Nao pressionado"));
        assert!(out.contains("setTimeout(() => location.reload(), 1000)"));
        assert!(out.ends_with("</body></html>"));
    }

    #[test]
    fn test_boundary_reading_renders_unrecognized() {
        let out = render(3048, 2048, false, true);
        assert!(out.contains("Local: Nao identificado"));
        assert!(out.contains("Botão A: Nao pressionado"));
        assert!(out.contains("Botão B: Pressionado"));
    }

    #[test]
    fn test_worst_case_fits() {
        // Longest direction label with the longest button labels
        let out = render(ADC_MAX, 3048, false, false);
        assert!(out.len() <= crate::pages::RESPONSE_CAPACITY);
        assert!(out.contains("Nao identificado"));
    }

    #[test]
    fn test_sensor_failure_is_propagated() {
        let mut page = JoystickPage::new(BrokenStick, FixedButtons(ButtonLevels::default()));
        let mut out = Response::new();
        let result = block_on(page.render(&mut out));
        assert!(matches!(result, Err(PageError::Sensor(_))));
        assert!(out.is_empty());
    }
}

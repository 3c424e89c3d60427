//! Desktop simulator for the sensor panel.
//!
//! Serves the joystick or thermometer page over `std::net` from synthetic
//! readings so the pages can be exercised in a browser without hardware.
//!
//! ```text
//! panel-simulator [joystick|thermometer] [config.toml]
//! ```
//!
//! # Console input
//!
//! | Line | Joystick variant     | Thermometer variant |
//! |------|----------------------|---------------------|
//! | a    | toggle button A held | press button A      |
//! | b    | toggle button B held | press button B      |
//!
//! Without a config file the page is served on port 8080. Set `RUST_LOG` to
//! change the log level (defaults to `info`).

mod sensors;
mod stream;

use std::io::BufRead;
use std::net::{Ipv4Addr, TcpListener};
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::{env, fs, thread};

use embassy_futures::block_on;
use log::{error, info, warn};

use panel_core::app_state::{AppError, Startup};
use panel_core::config::Config;
use panel_core::latch::ButtonLatches;
use panel_core::pages::{JoystickPage, PageSource, ThermometerPage};
use panel_core::server::serve_connection;

use sensors::{HELD, SimulatedButtons, SimulatedJoystick, SimulatedThermometer};
use stream::StreamConnection;

/// Port used when no config file is given, avoiding the privileged port 80
const SIMULATOR_PORT: u16 = 8080;

static BUTTONS: ButtonLatches = ButtonLatches::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Joystick,
    Thermometer,
}

impl Variant {
    fn parse(arg: Option<&str>) -> Option<Self> {
        match arg {
            None | Some("joystick") => Some(Self::Joystick),
            Some("thermometer") => Some(Self::Thermometer),
            Some(_) => None,
        }
    }
}

fn load_config(path: Option<&str>) -> Result<Config, String> {
    let Some(path) = path else {
        let mut config = Config::default();
        config.server.port = SIMULATOR_PORT;
        return Ok(config);
    };
    let text = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    parse_config(&text).map_err(|e| format!("{path}: {e}"))
}

fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Read button commands from stdin until it closes.
fn spawn_input_thread(variant: Variant) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let index = match line.trim() {
                "a" | "A" => 0,
                "b" | "B" => 1,
                "" => continue,
                other => {
                    warn!("Unknown input {:?}, expected a or b", other);
                    continue;
                }
            };
            let name = if index == 0 { "A" } else { "B" };

            match variant {
                Variant::Joystick => {
                    let held = !HELD[index].fetch_xor(true, Ordering::Relaxed);
                    info!("Button {} {}", name, if held { "held" } else { "released" });
                }
                Variant::Thermometer => {
                    let latch = if index == 0 { &BUTTONS.a } else { &BUTTONS.b };
                    latch.press();
                    info!("Button {} pressed", name);
                }
            }
        }
    });
}

/// Accept and serve connections one at a time, forever.
fn serve<P: PageSource>(
    listener: &TcpListener,
    config: &Config,
    page: &mut P,
) -> Result<(), AppError> {
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                warn!("accept failed: {}", e);
                continue;
            }
        };
        let peer = stream.peer_addr().ok();
        let mut conn = match StreamConnection::new(stream, config.server.socket_timeout_ms) {
            Ok(conn) => conn,
            Err(e) => {
                warn!("socket setup failed: {}", e);
                continue;
            }
        };
        info!("Accepted {:?}", peer);

        match block_on(serve_connection(&mut conn, page)) {
            Ok(served) => info!("Connection closed after {} response(s)", served),
            Err(e) => warn!("Connection dropped: {}", e),
        }
    }
    Err(AppError::SocketCreate)
}

fn run(variant: Variant, config: &Config) -> Result<(), AppError> {
    let mut startup = Startup::new();
    let port = config.server.port;

    // No radio on the host: loopback stands in for the DHCP lease
    startup.begin_connect()?;
    startup.connected(Ipv4Addr::LOCALHOST)?;

    let listener = match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)) {
        Ok(listener) => listener,
        Err(e) => {
            error!("bind failed: {}", e);
            return Err(startup.fail(AppError::Bind { port }));
        }
    };
    startup.listening(port)?;
    info!("Serving {:?} page on http://localhost:{}/", variant, port);

    spawn_input_thread(variant);

    match variant {
        Variant::Joystick => {
            let mut page = JoystickPage::new(SimulatedJoystick::new(), SimulatedButtons);
            serve(&listener, config, &mut page)
        }
        Variant::Thermometer => {
            let mut page = ThermometerPage::new(SimulatedThermometer::new(), &BUTTONS);
            serve(&listener, config, &mut page)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting sensor panel simulator");
    info!("Type a or b then Enter to operate the buttons");

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(variant) = Variant::parse(args.first().map(String::as_str)) else {
        error!("usage: panel-simulator [joystick|thermometer] [config.toml]");
        return ExitCode::FAILURE;
    };

    let config = match load_config(args.get(1).map(String::as_str)) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(variant, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Simulator stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parse() {
        assert_eq!(Variant::parse(None), Some(Variant::Joystick));
        assert_eq!(Variant::parse(Some("thermometer")), Some(Variant::Thermometer));
        assert_eq!(Variant::parse(Some("hygrometer")), None);
    }

    #[test]
    fn test_internet_only_config_fills_server_defaults() {
        let config = parse_config(
            r#"
            [internet]
            ssid = "Labirang"
            password = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.internet.ssid.as_str(), "Labirang");
        assert_eq!(config.internet.connect_timeout_ms, 30_000);
        assert_eq!(config.server.port, 80);
        assert_eq!(config.server.socket_timeout_ms, Some(10_000));
    }

    #[test]
    fn test_server_overrides() {
        let config = parse_config(
            r#"
            [server]
            port = 9000
            startup_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.startup_attempts, 3);
        assert!(config.internet.ssid.is_empty());
    }

    #[test]
    fn test_oversized_ssid_rejected() {
        let text = format!("[internet]\nssid = \"{}\"\n", "x".repeat(33));
        assert!(parse_config(&text).is_err());
    }

    #[test]
    fn test_default_config_uses_simulator_port() {
        let config = load_config(None).unwrap();
        assert_eq!(config.server.port, SIMULATOR_PORT);
    }
}

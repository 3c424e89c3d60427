//! Wi-Fi station bring-up
//!
//! Drives the [`Startup`] state machine through `Connecting → Connected`:
//! configure the station for WPA2-Personal, connect and wait for a DHCP
//! lease, all within the configured connect timeout.

use core::net::Ipv4Addr;

use embassy_executor::Spawner;
use embassy_net::{Stack, StackResources};
use embassy_time::{Duration, Timer, with_timeout};
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use esp_radio::wifi::{AuthMethod, ClientConfig, ModeConfig, WifiController, WifiError, WifiEvent};
use log::{info, warn};
use static_cell::StaticCell;

use panel_core::app_state::{AppError, ErrorDetail, Startup, describe};
use panel_core::config::{Config, InternetConfig};

use crate::net::net_task;

/// Sockets needed by the stack: DHCP plus the listener, with one spare
const STACK_SOCKETS: usize = 3;

/// Bring up the radio and the network stack, and spawn the stack runner.
pub fn init_radio(
    spawner: &Spawner,
    wifi: WIFI<'static>,
) -> Result<(WifiController<'static>, Stack<'static>), AppError> {
    static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    static RESOURCES: StaticCell<StackResources<STACK_SOCKETS>> = StaticCell::new();

    let radio = esp_radio::init().map_err(|e| AppError::WifiInit(describe(&e)))?;
    let radio = RADIO.init(radio);

    let (controller, interfaces) = esp_radio::wifi::new(radio, wifi, Default::default())
        .map_err(|e| AppError::WifiInit(describe(&e)))?;

    let rng = Rng::new();
    let seed = (u64::from(rng.random()) << 32) | u64::from(rng.random());

    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    spawner
        .spawn(net_task(runner))
        .map_err(|_| AppError::TaskSpawn("network"))?;

    Ok((controller, stack))
}

/// One attempt to join the access point and obtain an address.
pub async fn join(
    controller: &mut WifiController<'static>,
    stack: Stack<'static>,
    internet: &InternetConfig,
    startup: &mut Startup,
) -> Result<Ipv4Addr, AppError> {
    startup.begin_connect()?;

    let client = ClientConfig::default()
        .with_ssid(internet.ssid.as_str().into())
        .with_password(internet.password.as_str().into())
        .with_auth_method(AuthMethod::Wpa2Personal);

    if let Err(e) = controller.set_config(&ModeConfig::Client(client)) {
        return Err(startup.fail(AppError::WifiInit(describe(&e))));
    }

    if !matches!(controller.is_started(), Ok(true)) {
        if let Err(e) = controller.start_async().await {
            return Err(startup.fail(AppError::WifiInit(describe(&e))));
        }
    }

    info!("Connecting to Wi-Fi \"{}\"...", internet.ssid);

    let timeout_ms = internet.connect_timeout_ms;
    let attempt = with_timeout(Duration::from_millis(timeout_ms as u64), async {
        controller.connect_async().await?;
        stack.wait_config_up().await;
        Ok::<(), WifiError>(())
    })
    .await;

    match attempt {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(startup.fail(AppError::WifiConnect(describe(&e)))),
        Err(_) => return Err(startup.fail(AppError::WifiConnectTimeout { timeout_ms })),
    }

    let Some(address) = stack.config_v4().map(|config| config.address.address()) else {
        let detail = ErrorDetail::try_from("no IPv4 address after DHCP").unwrap_or_default();
        return Err(startup.fail(AppError::WifiConnect(detail)));
    };

    startup.connected(address)?;
    info!("Connected! IP: {}", address);
    Ok(address)
}

/// Join with the retry policy from `config.server`.
pub async fn join_with_retries(
    controller: &mut WifiController<'static>,
    stack: Stack<'static>,
    config: &Config,
    startup: &mut Startup,
) -> Result<Ipv4Addr, AppError> {
    loop {
        match join(controller, stack, &config.internet, startup).await {
            Ok(address) => return Ok(address),
            Err(e) if startup.can_retry(config.server.startup_attempts) => {
                warn!(
                    "Attempt {} of {} failed ({}), retrying in {} ms",
                    startup.attempts(),
                    config.server.startup_attempts,
                    e,
                    config.server.retry_delay_ms
                );
                if let Err(e) = controller.disconnect_async().await {
                    warn!("Disconnect before retry failed: {:?}", e);
                }
                Timer::after_millis(config.server.retry_delay_ms as u64).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Report link loss. There is no reconnection after startup.
#[embassy_executor::task]
pub async fn link_watch_task(mut controller: WifiController<'static>) {
    loop {
        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("Wi-Fi link lost");
    }
}

#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;
use log::info;

use panel_core::app_state::{AppError, Startup};
use panel_core::config::{Config, THERMOMETER_CONNECT_TIMEOUT_MS};
use panel_core::latch::ButtonLatches;
use panel_core::pages::ThermometerPage;
use panel_firmware::hardware::{AdcThermometer, button_edge_task, button_input};
use panel_firmware::{net, park, wifi, wifi_secrets};

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

/// Presses latched by the edge tasks, consumed by each page render
static BUTTONS: ButtonLatches = ButtonLatches::new();

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!(log::LevelFilter::Info);

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    let mut startup = Startup::new();

    let edge_tasks = [
        (button_input(peripherals.GPIO5), &BUTTONS.a, "A"),
        (button_input(peripherals.GPIO6), &BUTTONS.b, "B"),
    ];
    for (input, latch, name) in edge_tasks {
        if let Err(e) = spawner.spawn(button_edge_task(input, latch, name)) {
            log::error!("Button {} watcher: {:?}", name, e);
            park(startup.fail(AppError::TaskSpawn("button"))).await;
        }
    }

    let thermometer = AdcThermometer::new(peripherals.ADC1, peripherals.GPIO3);
    let mut page = ThermometerPage::new(thermometer, &BUTTONS);

    let config = match wifi_secrets::internet_config(THERMOMETER_CONNECT_TIMEOUT_MS) {
        Ok(internet) => Config::new(internet),
        Err(e) => park(startup.fail(e.into())).await,
    };

    let (mut controller, stack) = match wifi::init_radio(&spawner, peripherals.WIFI) {
        Ok(radio) => radio,
        Err(e) => park(startup.fail(e)).await,
    };

    if let Err(e) = wifi::join_with_retries(&mut controller, stack, &config, &mut startup).await {
        park(e).await;
    }

    if let Err(e) = spawner.spawn(wifi::link_watch_task(controller)) {
        log::warn!("Link watch not running: {:?}", e);
    }

    let Err(e) = net::serve_forever(stack, &config.server, &mut page, &mut startup).await;
    park(e).await
}

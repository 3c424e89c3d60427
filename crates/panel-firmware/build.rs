//! Links the esp-hal memory layout and bakes the Wi-Fi credentials into the
//! firmware. Credentials come from the environment or a `.env` file found
//! from the package directory upwards.

const SECRETS: [&str; 2] = ["WIFI_SSID", "WIFI_PASSWORD"];

fn main() {
    println!("cargo:rustc-link-arg=-Tlinkall.x");

    match dotenvy::dotenv() {
        Ok(path) => println!("cargo:rerun-if-changed={}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => println!("cargo:warning=failed to read .env: {e}"),
    }

    for key in SECRETS {
        println!("cargo:rerun-if-env-changed={key}");
        let value = std::env::var(key).unwrap_or_default();
        if value.is_empty() {
            println!("cargo:warning={key} is not set, the firmware will fail to join Wi-Fi");
        }
        println!("cargo:rustc-env={key}={value}");
    }
}

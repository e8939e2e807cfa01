//! Interactive server launcher.
//!
//! Asks where to listen and which pipeline config to use, shows what the
//! server will run with, and starts it once confirmed.

use std::net::IpAddr;

use crime_risk_analytics::config::{CONFIG_ENV_VAR, load_from_env};
use dialoguer::{Confirm, Input};

/// Prompts for a listen address, port and optional config file, then runs
/// [`super::run_server`] with them.
///
/// The answers are handed over through `BIND_ADDR`, `PORT` and
/// `CRIME_RISK_CONFIG`. A config that fails to load is reported before any
/// socket is bound.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the chosen config is invalid or the
/// server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Crime Risk Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Listen address")
        .default("127.0.0.1".to_string())
        .validate_with(|input: &String| {
            input
                .parse::<IpAddr>()
                .map(|_| ())
                .map_err(|_| "not an IP address")
        })
        .interact_text()
        .map_err(std::io::Error::other)?;

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(8080)
        .interact_text()
        .map_err(std::io::Error::other)?;

    let config_path: String = Input::new()
        .with_prompt("Pipeline config file (blank for built-in)")
        .allow_empty(true)
        .interact_text()
        .map_err(std::io::Error::other)?;

    // SAFETY: No other threads exist yet; the server reads these once on
    // startup.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", port.to_string());
        if config_path.trim().is_empty() {
            std::env::remove_var(CONFIG_ENV_VAR);
        } else {
            std::env::set_var(CONFIG_ENV_VAR, config_path.trim());
        }
    }

    let config = load_from_env().map_err(std::io::Error::other)?;
    println!(
        "{} area range(s), {} trees, seed {}",
        config.areas.len(),
        config.classifier.n_estimators,
        config.classifier.seed
    );

    let start = Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .map_err(std::io::Error::other)?;

    if !start {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}

//! Interactive menu shown when no subcommand is given.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};

use crate::{IncidentSource, predict, resolve_config};

/// Top-level actions.
enum Action {
    PredictFile,
    PredictUrl,
    Server,
}

impl Action {
    const ALL: &[Self] = &[Self::PredictFile, Self::PredictUrl, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::PredictFile => "Predict risk tiers from a local CSV",
            Self::PredictUrl => "Predict risk tiers from a CSV URL",
            Self::Server => "Start server",
        }
    }
}

/// Prompts for an action and its inputs, then runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected action fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Crime Risk Toolchain");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    let source = match Action::ALL[idx] {
        Action::PredictFile => {
            let path: String = Input::new().with_prompt("CSV path").interact_text()?;
            IncidentSource::File(PathBuf::from(path))
        }
        Action::PredictUrl => {
            let url: String = Input::new().with_prompt("CSV URL").interact_text()?;
            IncidentSource::Url(url)
        }
        Action::Server => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(crime_risk_server::interactive::run())
            })
            .await??;
            return Ok(());
        }
    };

    let zip: String = Input::new()
        .with_prompt("Postal code filter (blank for all areas)")
        .allow_empty(true)
        .interact_text()?;

    let json = Confirm::new()
        .with_prompt("Print as JSON?")
        .default(false)
        .interact()?;

    let config = resolve_config(None)?;
    let filter = Some(zip.trim()).filter(|z| !z.is_empty());

    predict(&source, filter, &config, json).await
}

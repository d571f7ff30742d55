mod cli;
mod context;
mod errors;
mod journey;
mod runner;
mod snapshot;
mod suites;

use std::{collections::HashSet, process::ExitCode, sync::Arc};

use browser::status::wait_for_webdriver;
use clap::Parser;
use common::fixtures::{load_env_file, load_test_data};
use mimalloc::MiMalloc;
use strum::IntoEnumIterator;
use tracing::{error, info};
use utils::logger::configure_logger;

use crate::{
    cli::{Cli, Command},
    errors::JourneyError,
    journey::Journey,
    runner::RunSettings,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    configure_logger();

    let mut cli = Cli::parse();

    match load_env_file(&cli.env_file) {
        // parse again so values from the env file fill in unset options
        Ok(true) => cli = Cli::parse(),
        Ok(false) => {}
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    }

    match execute(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<bool, JourneyError> {
    match &cli.command {
        Command::Run { journeys } => run(&cli, journeys).await,
        Command::List => {
            for journey in Journey::iter() {
                println!("{journey}  [{}]  {}", journey.suite(), journey.title());
            }

            Ok(true)
        }
        Command::VerifySnapshot { file, json } => {
            let report = snapshot::verify_saved_cart(file).await?;
            println!("{}", snapshot::render_report(&report, *json)?);

            Ok(report.all_calculations_correct)
        }
    }
}

async fn run(cli: &Cli, selected: &[Journey]) -> Result<bool, JourneyError> {
    let data = load_test_data(&cli.test_data)?;

    let mut journeys: Vec<Journey> = match selected.len() {
        0 => Journey::iter().collect(),
        _ => selected.to_vec(),
    };
    let mut seen = HashSet::new();
    journeys.retain(|journey| seen.insert(*journey));

    wait_for_webdriver(&cli.webdriver_url).await?;

    info!(
        "Running {} journeys against {} with {} {} worker(s)",
        journeys.len(),
        cli.base_url,
        cli.workers,
        cli.browser
    );

    let settings = Arc::new(RunSettings {
        session: cli.session_options(),
        base_url: cli.base_url.clone(),
        workers: cli.workers,
        data,
    });

    let results = runner::run_journeys(settings, journeys).await;
    let passed = runner::summarize(&results);

    if let Err(err) = tokio::task::spawn_blocking(metrics::shutdown).await {
        error!("Metrics shutdown did not complete: {err}");
    }

    Ok(passed)
}

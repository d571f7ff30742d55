use std::path::PathBuf;

use browser::{BrowserKind, SessionOptions, options::DEFAULT_WEBDRIVER_URL};
use clap::{Parser, Subcommand};
use common::fixtures::DEFAULT_TEST_DATA_PATH;
use storefront::pages::base::BASE_URL;

use crate::journey::Journey;

#[derive(Parser, Debug)]
#[command(
    name = "journeys",
    version,
    about = "Storefront end-to-end journeys with cart price verification"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// WebDriver server sessions are requested from
    #[arg(long, env = "WEBDRIVER_URL", default_value = DEFAULT_WEBDRIVER_URL, global = true)]
    pub webdriver_url: String,

    /// Storefront every relative path is resolved against
    #[arg(long, env = "BASE_URL", default_value = BASE_URL, global = true)]
    pub base_url: String,

    /// chrome, firefox or safari
    #[arg(long, env = "BROWSER", default_value = "chrome", global = true)]
    pub browser: BrowserKind,

    #[arg(long, env = "HEADLESS", global = true)]
    pub headless: bool,

    /// Maximum number of concurrent browser sessions
    #[arg(long, env = "WORKERS", default_value_t = 1, global = true)]
    pub workers: usize,

    #[arg(long, env = "TEST_DATA", default_value = DEFAULT_TEST_DATA_PATH, global = true)]
    pub test_data: PathBuf,

    #[arg(long, env = "ENV_FILE", default_value = ".env", global = true)]
    pub env_file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the named journeys, or all of them
    Run {
        /// Journey ids such as TC001
        journeys: Vec<Journey>,
    },
    /// List every journey with its suite
    List,
    /// Verify the prices of a saved cart page without a browser
    VerifySnapshot {
        file: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::builder()
            .set_webdriver_url(self.webdriver_url.clone())
            .set_kind(self.browser)
            .set_headless(self.headless)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_case_insensitive_ids() {
        let cli = Cli::try_parse_from(["journeys", "run", "tc001", "TC007"]).unwrap();

        let Command::Run { journeys } = cli.command else {
            panic!("expected the run command");
        };

        assert_eq!(journeys, [Journey::Tc001, Journey::Tc007]);
    }

    #[test]
    fn unknown_journeys_are_rejected() {
        assert!(Cli::try_parse_from(["journeys", "run", "TC099"]).is_err());
    }

    #[test]
    fn verify_snapshot_takes_a_file() {
        let cli = Cli::try_parse_from([
            "journeys",
            "verify-snapshot",
            "reports/cart.html",
            "--json",
            "--browser",
            "firefox",
        ])
        .unwrap();

        assert_eq!(cli.browser, BrowserKind::Firefox);
        assert!(matches!(
            cli.command,
            Command::VerifySnapshot { ref file, json: true } if file == &PathBuf::from("reports/cart.html")
        ));
    }
}

//! Command line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser, Debug)]
#[command(
    name = "ecoleta",
    version,
    about = "Register waste collection points from the terminal"
)]
pub(crate) struct Cli {
    /// Base address of the Ecoleta backend serving /items and /points.
    #[arg(long, env = "ECOLETA_API_URL", default_value = ecoleta_provider_api::DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Base address of the IBGE localidades API.
    #[arg(long, env = "ECOLETA_GEO_URL", default_value = ecoleta_provider_ibge::DEFAULT_BASE_URL)]
    pub geo_url: String,

    /// Timeout applied to every HTTP request, in seconds.
    #[arg(long, env = "ECOLETA_TIMEOUT_SECS", default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Write logs to a file; without it logs are discarded since the UI owns the terminal.
    #[arg(long, env = "ECOLETA_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

impl Cli {
    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "ecoleta",
            "--api-url",
            "http://api.test:3333",
            "--geo-url",
            "http://geo.test",
            "--timeout-secs",
            "3",
            "-v",
        ])
        .expect("parse");

        assert_eq!(cli.api_url, "http://api.test:3333");
        assert_eq!(cli.geo_url, "http://geo.test");
        assert_eq!(cli.request_timeout(), Duration::from_secs(3));
        assert_eq!(cli.verbosity.tracing_level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["ecoleta", "--timeout-secs", "0"]).is_err());
    }
}

//! Watcher configuration and CLI argument parsing
//!
//! Settings come from command-line arguments or environment variables with
//! the `SLIPPY_` prefix.
//!
//! # Configuration Priority
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Default values (lowest priority)
//!
//! # Example Usage
//!
//! ```bash
//! # Count values seen in the last 10 seconds, report twice a second
//! slippy --window-secs 10 --report-interval-ms 500
//!
//! # Using environment variables
//! export SLIPPY_WINDOW_SECS=60
//! slippy
//!
//! # Never expire anything (window disabled)
//! slippy --window-secs 0
//! ```

use anyhow::{Result, anyhow};
use clap::Parser;
use std::time::Duration;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Configuration for the `slippy` watcher
#[derive(Debug, Clone)]
pub struct Config {
    /// Lookback window in seconds; `<= 0` disables expiration
    pub window_secs: i64,
    /// How often the current count is printed (milliseconds)
    pub report_interval_ms: u64,
    /// Handoff capacity between the reader and the counter actor
    pub buffer_size: usize,
    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,
}

/// Command-line arguments for the watcher
///
/// Every argument can also be set through a `SLIPPY_` environment variable.
#[derive(Parser, Debug)]
#[command(
    name = "slippy",
    about = "Print a running windowed sum of integers read from stdin",
    long_about = "Reads one integer per line from stdin and periodically prints the sum of the values \
                  seen within the last window.\n\nNon-positive values are ignored. A window of 0 or \
                  less disables expiration.\n\nEnvironment variables with SLIPPY_ prefix are supported. \
                  CLI arguments take precedence over environment variables."
)]
pub struct Args {
    #[arg(
        long,
        value_name = "SECS",
        help = "Lookback window in seconds (<= 0 disables expiration)",
        default_value_t = 30,
        allow_negative_numbers = true,
        env = "SLIPPY_WINDOW_SECS"
    )]
    pub window_secs: i64,
    #[arg(
        long,
        value_name = "MS",
        help = "How often to print the current count (milliseconds)",
        default_value_t = 1000,
        env = "SLIPPY_REPORT_INTERVAL_MS"
    )]
    pub report_interval_ms: u64,
    #[arg(
        long,
        value_name = "SIZE",
        help = "Handoff capacity to the counter",
        default_value_t = 1,
        env = "SLIPPY_BUFFER_SIZE"
    )]
    pub buffer_size: usize,
    #[arg(
        long,
        value_name = "LEVEL",
        help = "Log level: error, warn, info, debug, trace",
        default_value = "info",
        env = "SLIPPY_LOG_LEVEL"
    )]
    pub log_level: String,

    #[arg(
        long,
        help = "List all environment variables and exit",
        action = clap::ArgAction::SetTrue
    )]
    pub list_env_vars: bool,
}

impl Config {
    /// Build configuration from environment variables and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if a value fails validation.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();

        if args.list_env_vars {
            Self::print_env_vars();
            std::process::exit(0);
        }

        Self::from_args(args)
    }

    fn from_args(args: Args) -> Result<Self> {
        let config = Config {
            window_secs: args.window_secs,
            report_interval_ms: args.report_interval_ms,
            buffer_size: args.buffer_size,
            log_level: args.log_level.to_lowercase(),
        };

        config.validate()?;

        Ok(config)
    }

    /// Lookback window; zero when expiration is disabled
    pub fn window(&self) -> Duration {
        u64::try_from(self.window_secs)
            .map(Duration::from_secs)
            .unwrap_or(Duration::ZERO)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.report_interval_ms == 0 {
            return Err(anyhow!("--report-interval-ms must be greater than 0"));
        }

        if self.buffer_size == 0 {
            return Err(anyhow!("--buffer-size must be greater than 0"));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level: {}. Valid options are: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        Ok(())
    }

    fn print_env_vars() {
        println!("Slippy Environment Variables");
        println!("============================");
        println!();
        println!("All environment variables use the SLIPPY_ prefix.");
        println!("CLI arguments take precedence over environment variables.");
        println!();
        println!("  SLIPPY_WINDOW_SECS=<secs>          Lookback window, <= 0 disables [default: 30]");
        println!("  SLIPPY_REPORT_INTERVAL_MS=<ms>     Count report interval [default: 1000]");
        println!("  SLIPPY_BUFFER_SIZE=<size>          Handoff capacity [default: 1]");
        println!(
            "  SLIPPY_LOG_LEVEL=<level>           Log level: error, warn, info, debug, trace [default: info]"
        );
        println!();
        println!("Examples:");
        println!("  export SLIPPY_WINDOW_SECS=60");
        println!("  tail -f events.log | awk '{{print $3}}' | slippy --window-secs 10");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        let args = Args::try_parse_from(std::iter::once("slippy").chain(args.iter().copied()))?;
        Config::from_args(args)
    }

    fn config(window_secs: i64) -> Config {
        Config {
            window_secs,
            report_interval_ms: 1000,
            buffer_size: 1,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_window_conversion() {
        assert_eq!(config(30).window(), Duration::from_secs(30));
        assert_eq!(config(0).window(), Duration::ZERO);
        assert_eq!(config(-5).window(), Duration::ZERO);
    }

    #[test]
    fn test_negative_window_parses() {
        let config = parse(&["--window-secs", "-1"]).unwrap();
        assert_eq!(config.window_secs, -1);
        assert_eq!(config.window(), Duration::ZERO);
    }

    #[test]
    fn test_explicit_args() {
        let config = parse(&[
            "--window-secs",
            "10",
            "--report-interval-ms",
            "250",
            "--buffer-size",
            "16",
            "--log-level",
            "DEBUG",
        ])
        .unwrap();

        assert_eq!(config.window(), Duration::from_secs(10));
        assert_eq!(config.report_interval(), Duration::from_millis(250));
        assert_eq!(config.buffer_size, 16);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_validation() {
        assert!(config(30).validate().is_ok());

        let mut bad = config(30);
        bad.report_interval_ms = 0;
        assert!(bad.validate().is_err());

        let mut bad = config(30);
        bad.buffer_size = 0;
        assert!(bad.validate().is_err());

        let mut bad = config(30);
        bad.log_level = "loud".to_string();
        assert!(bad.validate().is_err());
    }
}

mod config;

use anyhow::Result;
use slippy::SlippyCounter;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration from environment variables and CLI arguments
    let config = Config::from_env_and_args()?;

    // Initialize logging; stdout is reserved for counts
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("slippy={}", config.log_level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let counter = SlippyCounter::builder()
        .window(config.window())
        .handoff_capacity(config.buffer_size)
        .spawn();

    match counter.window() {
        Some(window) => tracing::info!("Counting values from the last {:?}", window),
        None => tracing::info!("Window disabled, values never expire"),
    }

    let reporter = tokio::spawn(report(counter.clone(), config.report_interval()));

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if let Some(value) = parse_value(&line) {
                        counter.add(value).await;
                    }
                }
                None => {
                    tracing::debug!("End of input");
                    break;
                }
            },
            _ = &mut shutdown => {
                tracing::info!("Interrupted, freezing counter");
                break;
            }
        }
    }

    counter.close();
    reporter.abort();

    let stats = counter.stats();
    tracing::info!(
        accepted = stats.accepted,
        ignored = stats.ignored,
        expired = stats.expired,
        "Counter closed"
    );
    println!("final count: {}", counter.count());

    Ok(())
}

/// Print the current count every `interval`
async fn report(counter: SlippyCounter, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        println!("count: {}", counter.count());
    }
}

/// Parse one input line; blank lines are skipped silently, junk with a warning
fn parse_value(line: &str) -> Option<i64> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring input {:?}: {}", trimmed, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_value;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), Some(42));
        assert_eq!(parse_value("  7 \n"), Some(7));
        assert_eq!(parse_value("-3"), Some(-3));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("   "), None);
        assert_eq!(parse_value("twelve"), None);
        assert_eq!(parse_value("1.5"), None);
    }
}

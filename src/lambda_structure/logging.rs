use std::str::FromStr;

use common::config::ConfigLoader;
use lambda_runtime::Error;
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{prelude::*, reload, Registry};

#[derive(Deserialize, Debug)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, Error> {
        Ok(LevelFilter::from_str(self.log_level.trim())?)
    }
}

/// Process wide tracing setup: bunyan JSON lines written to stdout by a non blocking worker.
///
/// Dropping this flushes the pending lines, so it must outlive the runtime loop.
pub struct Logging {
    level: LevelFilter,
    reload_handle: reload::Handle<LevelFilter, Registry>,
    _guard: WorkerGuard,
}

impl Logging {
    pub fn init(app_name: String) -> Result<Self, Error> {
        LogTracer::init()?;

        let level = ConfigLoader::load_default::<LoggingConfig>()?.level_filter()?;

        let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        let bunyan_formatting_layer = BunyanFormattingLayer::new(app_name, non_blocking_writer);

        // Instantiate a tracing subscriber with reloadable level filter
        let (filter, reload_handle) = reload::Layer::new(level);
        tracing_subscriber::registry()
            .with(filter)
            .with(JsonStorageLayer)
            .with(bunyan_formatting_layer)
            .try_init()?;

        Ok(Self {
            level,
            reload_handle,
            _guard: guard,
        })
    }

    /// Restores the configured level at the start of an invocation.
    pub fn reset_level(&self) {
        let level = self.level;
        self.reload_handle
            .modify(|filter| *filter = level)
            .unwrap_or_else(|e| tracing::error!(error = ?e, "{:?}", e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::info("info", LevelFilter::INFO)]
    #[case::uppercase("WARN", LevelFilter::WARN)]
    #[case::padded(" debug ", LevelFilter::DEBUG)]
    #[case::off("off", LevelFilter::OFF)]
    fn parses_log_level(#[case] log_level: &str, #[case] expected: LevelFilter) {
        let config = LoggingConfig {
            log_level: log_level.to_owned(),
        };

        assert_eq!(config.level_filter().unwrap(), expected);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let config = LoggingConfig {
            log_level: "chatty".to_owned(),
        };

        assert!(config.level_filter().is_err());
    }

    #[test]
    fn log_level_defaults_to_info() {
        assert_eq!(default_log_level(), "info");
    }
}

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Install a terminal logger for the `log` records emitted by the collector.
///
/// Meant for binaries and test harnesses embedding the crate. Fails if a
/// logger is already installed.
pub fn init_logging(level: LevelFilter) -> Result<()> {
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
        .context("Failed to initialize logger")?;
    Ok(())
}

/// `Debug` when verbose, `Info` otherwise
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_installs_once() {
        assert!(init_logging(level_for(true)).is_ok());
        log::debug!("[Data collector] logger ready");
        assert!(init_logging(level_for(false)).is_err());
    }
}

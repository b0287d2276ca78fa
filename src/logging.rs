//! log4rs initialization.
//!
//! A `log4rs.yml` in the working directory is used when present, except with
//! `--verbose`, which always selects the built-in debug console logger.

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

pub const LOG_CONFIG_FILE: &str = "log4rs.yml";
const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} | {l:<8} | {m}{n}";

pub fn init(verbose: bool) -> Result<(), Box<dyn Error>> {
    if !verbose && Path::new(LOG_CONFIG_FILE).exists() {
        log4rs::init_file(LOG_CONFIG_FILE, Default::default())?;
        return Ok(());
    }
    log4rs::init_config(console_config(verbose)?)?;
    Ok(())
}

fn console_config(verbose: bool) -> Result<Config, Box<dyn Error>> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_config_levels() {
        let quiet = console_config(false).unwrap();
        assert_eq!(quiet.root().level(), LevelFilter::Info);
        let verbose = console_config(true).unwrap();
        assert_eq!(verbose.root().level(), LevelFilter::Debug);
    }
}

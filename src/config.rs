use crate::engine::{
    DEFAULT_TICK_PERIOD,
    ThemeMode,
};
use color_eyre::eyre::{
    Result,
    eyre,
};
use std::{
    path::PathBuf,
    time::Duration,
};

pub const DEFAULT_LOG_DIR: &str = "~/.tile-roller/logs";
pub const LOG_FILE_NAME: &str = "tile-roller.log";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub tick_period: Duration,
    /// Fixed shuffle seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub theme: ThemeMode,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            tick_period: DEFAULT_TICK_PERIOD,
            seed: None,
            theme: ThemeMode::Light,
            log_dir: expand_dir(DEFAULT_LOG_DIR),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CliCommand {
    Run(AppConfig),
    Help,
}

pub fn usage() -> String {
    format!(
        "Usage: tile-roller [--seed <u64>] [--tick-ms <ms>] [--dark] [--log-dir <path>]\n\
         \n\
         Flags:\n\
           --seed <u64>      Use a fixed shuffle seed (reproducible rolls)\n\
           --tick-ms <ms>    Milliseconds between highlight steps (default {})\n\
           --dark            Start with the dark theme\n\
           --log-dir <path>  Directory for {} (default {})\n\
           -h, --help        Show this message\n\
         \n\
         Keys: space/enter start-stop | r reset | t theme | q/Esc quit",
        DEFAULT_TICK_PERIOD.as_millis(),
        LOG_FILE_NAME,
        DEFAULT_LOG_DIR,
    )
}

/// Parses command line arguments, excluding the program name.
pub fn parse_args<I>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut seed: Option<u64> = None;
    let mut tick_ms: Option<u64> = None;
    let mut dark = false;
    let mut log_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let raw = args
                    .next()
                    .ok_or_else(|| eyre!("--seed requires a number argument"))?;
                if seed.is_some() {
                    return Err(eyre!("--seed may only be specified once"));
                }
                let value = raw
                    .parse::<u64>()
                    .map_err(|e| eyre!("invalid --seed value {raw:?}: {e}"))?;
                seed = Some(value);
            }
            "--tick-ms" => {
                let raw = args
                    .next()
                    .ok_or_else(|| eyre!("--tick-ms requires a number argument"))?;
                if tick_ms.is_some() {
                    return Err(eyre!("--tick-ms may only be specified once"));
                }
                let value = raw
                    .parse::<u64>()
                    .map_err(|e| eyre!("invalid --tick-ms value {raw:?}: {e}"))?;
                if value == 0 {
                    return Err(eyre!("--tick-ms must be greater than zero"));
                }
                tick_ms = Some(value);
            }
            "--dark" => {
                if dark {
                    return Err(eyre!("--dark may only be specified once"));
                }
                dark = true;
            }
            "--log-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--log-dir requires a path argument"))?;
                if log_dir.is_some() {
                    return Err(eyre!("--log-dir may only be specified once"));
                }
                log_dir = Some(expand_dir(&dir));
            }
            "--help" | "-h" => return Ok(CliCommand::Help),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    let defaults = AppConfig::default();
    Ok(CliCommand::Run(AppConfig {
        tick_period: tick_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick_period),
        seed,
        theme: if dark { ThemeMode::Dark } else { defaults.theme },
        log_dir: log_dir.unwrap_or(defaults.log_dir),
    }))
}

fn expand_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use tile_roller::config::{
    self,
    AppConfig,
    CliCommand,
    LOG_FILE_NAME,
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling,
};
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

mod controller;
mod ui;

/// The terminal belongs to the UI, so logs go to `<log_dir>/tile-roller.log`.
fn init_tracing(config: &AppConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir).wrap_err_with(|| {
        format!("failed to create log directory {}", config.log_dir.display())
    })?;
    let appender = rolling::never(&config.log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("failed to install tracing subscriber: {e}"))?;
    Ok(guard)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let app_config = match config::parse_args(std::env::args().skip(1))? {
        CliCommand::Help => {
            println!("{}", config::usage());
            return Ok(());
        }
        CliCommand::Run(app_config) => app_config,
    };
    let _guard = init_tracing(&app_config)?;
    tracing::info!(?app_config, "starting tile-roller");
    controller::run_app(app_config).await
}

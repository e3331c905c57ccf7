mod config;
mod error;
mod logging;
mod runtime;
pub mod services;

pub use config::AppConfig;
pub use error::AppError;

pub fn run() -> Result<(), AppError> {
    let dotenv = dotenvy::dotenv();
    logging::init()?;

    if let Err(err) = dotenv
        && !err.not_found()
    {
        tracing::warn!(error = %err, "failed to load .env file");
    }

    let config = AppConfig::from_env()?;

    tracing::info!(
        http_bind = %config.http_bind,
        http_workers = ?config.http_workers,
        summary_seconds_low = config.summary_bounds.low(),
        summary_seconds_high = config.summary_bounds.high(),
        cors_allowed_origins = ?config.cors_allowed_origins,
        "application bootstrap initialized"
    );

    runtime::run(config)
}

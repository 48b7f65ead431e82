//! Logging bootstrap

use std::path::Path;

pub use rolling_logger::LoggerError;

pub const APP_NAME: &str = "PriceWatch";

/// Send all `tracing` output to `<log_dir>/PriceWatch.log`
pub fn init(log_dir: impl AsRef<Path>) -> Result<(), LoggerError> {
    rolling_logger::init_logger(log_dir, APP_NAME)?;
    let _ = rolling_logger::info("logger initialized");
    Ok(())
}

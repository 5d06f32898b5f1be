//! Logging utilities

use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

static LOGGER: Once = Once::new();

/// Initialize the logging system
///
/// Safe to call any number of times. If the host already installed a logger
/// the call leaves it in place.
pub fn init() {
    LOGGER.call_once(|| {
        if env_logger::try_init().is_err() {
            log::debug!("Logger already installed by host, keeping it");
        }
    });
}

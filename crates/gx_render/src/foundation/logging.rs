//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}

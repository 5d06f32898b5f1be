//! Process-wide one-time initialization
//!
//! Scenes and managers call [`ensure_initialized`] on construction, so the
//! setup runs exactly once before first use no matter which thread gets there
//! first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static INIT: Once = Once::new();
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Run process-wide setup if it has not run yet
pub fn ensure_initialized() {
    INIT.call_once(|| {
        log::info!(
            "Initializing {} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        INITIALIZED.store(true, Ordering::Release);
    });
}

/// Whether [`ensure_initialized`] has completed
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization_is_idempotent() {
        ensure_initialized();
        ensure_initialized();
        assert!(is_initialized());
    }
}

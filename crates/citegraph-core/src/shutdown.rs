//! Graceful shutdown: SIGINT/SIGTERM set an atomic flag that long stages
//! poll between records. A second signal while the flag is set exits at once.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, LazyLock};

use signal_hook::consts::{SIGINT, SIGTERM};

static FLAG: LazyLock<Arc<AtomicBool>> = LazyLock::new(|| Arc::new(AtomicBool::new(false)));

/// Global shutdown flag
pub fn shutdown_flag() -> &'static AtomicBool {
    &FLAG
}

/// Register SIGINT/SIGTERM handlers on the global flag.
pub fn install_signal_handlers() -> std::io::Result<()> {
    for sig in [SIGINT, SIGTERM] {
        // Order matters: the conditional exit must see the flag before the setter flips it.
        signal_hook::flag::register_conditional_shutdown(sig, 130, Arc::clone(&FLAG))?;
        signal_hook::flag::register(sig, Arc::clone(&FLAG))?;
    }
    Ok(())
}

//! Keyboard sink adapters.
//!
//! - `XdotoolKeyboard`: X11 desktops, shells out to `xdotool`
//! - `SendInputKeyboard`: Windows, injects through `SendInput`

#[cfg(windows)]
mod send_input;
mod xdotool;

use std::sync::Arc;

use notelog_core::{KeyboardSink, LogError};

#[cfg(windows)]
pub use send_input::SendInputKeyboard;
pub use xdotool::{DEFAULT_TYPE_DELAY_MS, XdotoolKeyboard};

#[cfg(not(windows))]
pub(crate) use xdotool::locate_xdotool;

/// The keyboard sink for the current platform.
pub fn platform_keyboard() -> Result<Arc<dyn KeyboardSink>, LogError> {
    #[cfg(windows)]
    {
        Ok(Arc::new(SendInputKeyboard::new()))
    }

    #[cfg(not(windows))]
    {
        Ok(Arc::new(XdotoolKeyboard::locate()?))
    }
}

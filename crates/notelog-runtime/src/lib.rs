//! OS adapters for notelog: editor process sessions, graceful shutdown,
//! keyboard injection and readiness probes.
#![deny(unsafe_code)]

mod factory;
mod instance;
pub mod keyboard;
pub mod readiness;
pub mod shutdown;

pub use factory::EditorSessionFactory;
pub use instance::EditorInstance;
pub use keyboard::{XdotoolKeyboard, platform_keyboard};
pub use readiness::{SettleProbe, WindowProbe, platform_probe};
pub use shutdown::{ClosePolicy, close_child};

#[cfg(windows)]
pub use keyboard::SendInputKeyboard;

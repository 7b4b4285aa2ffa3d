//! The two image plugins and their registration with the host.

pub mod chatimg;
pub mod randimg;

use crate::config::PluginConfig;
use crate::host::CallbackDispatcher;
pub use chatimg::ChatImg;
pub use randimg::RandImg;

/// Build both plugins from `config` and connect them to a fresh dispatcher.
///
/// # Errors
///
/// Returns an error if either plugin fails to start.
pub fn connect_all(config: &PluginConfig) -> eyre::Result<CallbackDispatcher> {
    let mut dispatcher = CallbackDispatcher::new();
    dispatcher.register(Box::new(ChatImg::new(config.chatimg.clone())?));
    dispatcher.register(Box::new(RandImg::new(config.randimg.clone())?));
    Ok(dispatcher)
}

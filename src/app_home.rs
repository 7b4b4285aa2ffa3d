use directories_next::ProjectDirs;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Helper that resolves the application config directory and provides helper methods
#[derive(Clone, Debug)]
pub struct AppHome(pub PathBuf);

impl AppHome {
    /// Returns a PathBuf for a filename under the app config dir
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }

    /// Resolve the AppHome:
    /// * If `CHATIMG_CONFIG_DIR` env var is set, use that directory
    /// * Otherwise use the platform `ProjectDirs::config_dir()` for chatimg
    ///
    /// # Errors
    ///
    /// Returns an error if no platform config directory can be determined.
    pub fn resolve() -> eyre::Result<AppHome> {
        if let Ok(override_dir) = env::var("CHATIMG_CONFIG_DIR") {
            return Ok(AppHome(PathBuf::from(override_dir)));
        }
        if let Some(pd) = ProjectDirs::from("", "", "chatimg") {
            Ok(AppHome(pd.config_dir().to_path_buf()))
        } else {
            Err(eyre::eyre!("Could not determine config directory"))
        }
    }
}

/// Cached AppHome instance
pub static APP_HOME: Lazy<AppHome> = Lazy::new(|| match AppHome::resolve() {
    Ok(a) => a,
    Err(e) => {
        warn!("Failed to resolve app home: {}", e);
        AppHome(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
});

//! Plugin configuration.
//!
//! The file lives at `${config_dir}/config.json` and every field in it is optional;
//! anything left out takes the defaults below.

use crate::app_home::AppHome;
use facet::Facet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_KEYWORD: &str = "!img";
pub const DEFAULT_SHEBANG_REQUIRED: bool = true;
pub const DEFAULT_MAX_WIDTH: u32 = 500;
pub const DEFAULT_MAX_HEIGHT: u32 = 1000;
pub const DEFAULT_BASEDIR: &str = ".";
pub const DEFAULT_BASERAND: &str = "truerand";

/// On-disk shape of the `chatimg` section.
#[derive(Debug, Clone, PartialEq, Default, Facet)]
#[facet(default)]
pub struct ChatImgSection {
    pub servers: Option<Vec<u32>>,
    pub keyword: Option<String>,
    pub shebang_required: Option<bool>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

/// On-disk shape of the `randimg` section.
#[derive(Debug, Clone, PartialEq, Default, Facet)]
#[facet(default)]
pub struct RandImgSection {
    pub servers: Option<Vec<u32>>,
    pub basedir: Option<String>,
    pub baselink: Option<String>,
    pub baserand: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub links: Option<Vec<String>>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

/// On-disk shape of the whole config file.
#[derive(Debug, Clone, PartialEq, Default, Facet)]
#[facet(default)]
pub struct ConfigFile {
    pub chatimg: Option<ChatImgSection>,
    pub randimg: Option<RandImgSection>,
}

impl ConfigFile {
    /// A file with every field spelled out at its default value.
    #[must_use]
    pub fn with_defaults() -> Self {
        ConfigFile::from(&PluginConfig::default())
    }

    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON for this shape.
    pub fn parse(text: &str) -> eyre::Result<ConfigFile> {
        facet_json::from_str(text).map_err(|e| eyre::eyre!("Failed to parse config: {}", e))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> eyre::Result<String> {
        facet_json::to_string(self).map_err(|e| eyre::eyre!("Failed to serialize config: {}", e))
    }
}

/// Settings for the URL-keyword plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatImgConfig {
    /// Servers to subscribe to; empty means every server
    pub servers: Vec<u32>,
    pub keyword: String,
    pub shebang_required: bool,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ChatImgConfig {
    fn default() -> Self {
        ChatImgConfig {
            servers: Vec::new(),
            keyword: DEFAULT_KEYWORD.to_string(),
            shebang_required: DEFAULT_SHEBANG_REQUIRED,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl From<ChatImgSection> for ChatImgConfig {
    fn from(section: ChatImgSection) -> Self {
        let defaults = ChatImgConfig::default();
        ChatImgConfig {
            servers: section.servers.unwrap_or(defaults.servers),
            keyword: section.keyword.unwrap_or(defaults.keyword),
            shebang_required: section.shebang_required.unwrap_or(defaults.shebang_required),
            max_width: section.max_width.unwrap_or(defaults.max_width),
            max_height: section.max_height.unwrap_or(defaults.max_height),
        }
    }
}

/// Settings for the keyword-directory plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandImgConfig {
    /// Servers to subscribe to; empty means every server
    pub servers: Vec<u32>,
    /// Root holding one subdirectory per keyword
    pub basedir: PathBuf,
    /// Link target for posted images; a trailing `/` means "append keyword/filename"
    pub baselink: String,
    /// Keyword that picks from every keyword directory at once
    pub baserand: String,
    pub keywords: Vec<String>,
    /// Accepted for compatibility with existing config files; carries no behaviour
    pub links: Vec<String>,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for RandImgConfig {
    fn default() -> Self {
        RandImgConfig {
            servers: Vec::new(),
            basedir: PathBuf::from(DEFAULT_BASEDIR),
            baselink: String::new(),
            baserand: DEFAULT_BASERAND.to_string(),
            keywords: Vec::new(),
            links: Vec::new(),
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl From<RandImgSection> for RandImgConfig {
    fn from(section: RandImgSection) -> Self {
        let defaults = RandImgConfig::default();
        RandImgConfig {
            servers: section.servers.unwrap_or(defaults.servers),
            basedir: section.basedir.map_or(defaults.basedir, PathBuf::from),
            baselink: section.baselink.unwrap_or(defaults.baselink),
            baserand: section.baserand.unwrap_or(defaults.baserand),
            keywords: section.keywords.unwrap_or(defaults.keywords),
            links: section.links.unwrap_or(defaults.links),
            max_width: section.max_width.unwrap_or(defaults.max_width),
            max_height: section.max_height.unwrap_or(defaults.max_height),
        }
    }
}

/// Resolved configuration for both plugins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PluginConfig {
    pub chatimg: ChatImgConfig,
    pub randimg: RandImgConfig,
}

impl From<ConfigFile> for PluginConfig {
    fn from(file: ConfigFile) -> Self {
        PluginConfig {
            chatimg: file.chatimg.map(ChatImgConfig::from).unwrap_or_default(),
            randimg: file.randimg.map(RandImgConfig::from).unwrap_or_default(),
        }
    }
}

impl From<&PluginConfig> for ConfigFile {
    fn from(config: &PluginConfig) -> Self {
        let chatimg = &config.chatimg;
        let randimg = &config.randimg;
        ConfigFile {
            chatimg: Some(ChatImgSection {
                servers: Some(chatimg.servers.clone()),
                keyword: Some(chatimg.keyword.clone()),
                shebang_required: Some(chatimg.shebang_required),
                max_width: Some(chatimg.max_width),
                max_height: Some(chatimg.max_height),
            }),
            randimg: Some(RandImgSection {
                servers: Some(randimg.servers.clone()),
                basedir: Some(randimg.basedir.display().to_string()),
                baselink: Some(randimg.baselink.clone()),
                baserand: Some(randimg.baserand.clone()),
                keywords: Some(randimg.keywords.clone()),
                links: Some(randimg.links.clone()),
                max_width: Some(randimg.max_width),
                max_height: Some(randimg.max_height),
            }),
        }
    }
}

impl PluginConfig {
    /// Path of the config file inside the given home
    #[must_use]
    pub fn config_file_path(home: &AppHome) -> PathBuf {
        home.file_path(CONFIG_FILE_NAME)
    }

    /// Loads resolving rules:
    /// - if the file exists, parse it and fill gaps with defaults
    /// - otherwise, create the file containing the defaults and return them
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or created.
    pub fn load_from(path: &Path) -> eyre::Result<PluginConfig> {
        if path.exists() {
            let text = fs::read_to_string(path)?;
            let file = ConfigFile::parse(&text)
                .map_err(|e| eyre::eyre!("{}: {}", path.display(), e))?;
            debug!(path = %path.display(), "Loaded config");
            return Ok(PluginConfig::from(file));
        }

        write_defaults(path)?;
        info!("Created default config at {}", path.display());
        Ok(PluginConfig::default())
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or created.
    pub fn load(home: &AppHome) -> eyre::Result<PluginConfig> {
        Self::load_from(&Self::config_file_path(home))
    }
}

/// Overwrite `path` with a config file holding every default value.
///
/// # Errors
///
/// Returns an error if the file or its parent directory cannot be written.
pub fn write_defaults(path: &Path) -> eyre::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, ConfigFile::with_defaults().to_json()?)?;
    Ok(())
}

pub mod command;
pub mod global_args;
pub mod json_log_behaviour;
pub mod to_args;

use crate::app_home::APP_HOME;
use crate::cli::command::Command;
use crate::cli::global_args::GlobalArgs;
use crate::config::PluginConfig;
use arbitrary::Arbitrary;
use arbitrary::Unstructured;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use to_args::ToArgs;

#[derive(Parser, Arbitrary, PartialEq, Debug)]
#[clap(version)]
pub struct Cli {
    #[clap(flatten)]
    pub global_args: GlobalArgs,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// # Errors
    ///
    /// Returns an error if the CLI command fails.
    pub fn invoke(self) -> eyre::Result<()> {
        let context = InvokeContext::from(&self.global_args);
        self.command.unwrap_or_default().invoke(&context)
    }
}

impl ToArgs for Cli {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        args.extend(self.global_args.to_args());
        if let Some(command) = &self.command {
            args.extend(command.to_args());
        }
        args
    }
}

/// What commands need from the global arguments.
#[derive(Clone, Debug)]
pub struct InvokeContext {
    pub config_path: PathBuf,
}

impl InvokeContext {
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, parsed or created.
    pub fn load_config(&self) -> eyre::Result<PluginConfig> {
        PluginConfig::load_from(&self.config_path)
    }
}

impl From<&GlobalArgs> for InvokeContext {
    fn from(args: &GlobalArgs) -> Self {
        InvokeContext {
            config_path: args
                .config
                .clone()
                .unwrap_or_else(|| PluginConfig::config_file_path(&APP_HOME)),
        }
    }
}

const WORD_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Non-empty lowercase word, safe to pass as a positional or option value.
///
/// # Errors
///
/// Never fails; exhausted input yields the shortest word.
pub fn arbitrary_word(u: &mut Unstructured) -> arbitrary::Result<String> {
    let len = u.int_in_range(1..=12)?;
    (0..len)
        .map(|_| u.choose(WORD_CHARS).map(|b| char::from(*b)))
        .collect()
}

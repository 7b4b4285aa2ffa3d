pub mod catalog;
pub mod config;
pub mod message;

use crate::cli::InvokeContext;
use crate::cli::command::catalog::CatalogArgs;
use crate::cli::command::config::ConfigArgs;
use crate::cli::command::message::message_command::MessageArgs;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Subcommand;
use std::ffi::OsString;

#[derive(Subcommand, Arbitrary, PartialEq, Debug)]
pub enum Command {
    /// Send a chat message through the plugins and print what they post
    Message(MessageArgs),

    /// Images available to the random-image plugin
    Catalog(CatalogArgs),

    /// Show or reset the plugin configuration
    Config(ConfigArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Config(ConfigArgs::default())
    }
}

impl Command {
    /// # Errors
    ///
    /// Returns an error if the selected command fails.
    pub fn invoke(self, context: &InvokeContext) -> eyre::Result<()> {
        match self {
            Command::Message(args) => args.invoke(context),
            Command::Catalog(args) => args.invoke(context),
            Command::Config(args) => args.invoke(context),
        }
    }
}

impl ToArgs for Command {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        match self {
            Command::Message(message_args) => {
                args.push("message".into());
                args.extend(message_args.to_args());
            }
            Command::Catalog(catalog_args) => {
                args.push("catalog".into());
                args.extend(catalog_args.to_args());
            }
            Command::Config(config_args) => {
                args.push("config".into());
                args.extend(config_args.to_args());
            }
        }
        args
    }
}

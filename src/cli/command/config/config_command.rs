use crate::cli::InvokeContext;
use crate::cli::command::config::config_path_command::ConfigPathArgs;
use crate::cli::command::config::config_reset_command::ConfigResetArgs;
use crate::cli::command::config::config_show_command::ConfigShowArgs;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Subcommand;
use std::ffi::OsString;

#[derive(Subcommand, Clone, Arbitrary, PartialEq, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration (defaults filled in)
    Show(ConfigShowArgs),

    /// Print where the config file lives
    Path(ConfigPathArgs),

    /// Overwrite the config file with the defaults
    Reset(ConfigResetArgs),
}

impl Default for ConfigCommand {
    fn default() -> Self {
        ConfigCommand::Show(ConfigShowArgs {})
    }
}

impl ConfigCommand {
    /// # Errors
    ///
    /// Returns an error if the subcommand fails.
    pub fn invoke(self, context: &InvokeContext) -> eyre::Result<()> {
        match self {
            ConfigCommand::Show(args) => args.invoke(context),
            ConfigCommand::Path(args) => args.invoke(context),
            ConfigCommand::Reset(args) => args.invoke(context),
        }
    }
}

impl ToArgs for ConfigCommand {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        match self {
            ConfigCommand::Show(a) => {
                args.push("show".into());
                args.extend(a.to_args());
            }
            ConfigCommand::Path(a) => {
                args.push("path".into());
                args.extend(a.to_args());
            }
            ConfigCommand::Reset(a) => {
                args.push("reset".into());
                args.extend(a.to_args());
            }
        }
        args
    }
}

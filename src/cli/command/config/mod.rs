pub mod config_command;
pub mod config_path_command;
pub mod config_reset_command;
pub mod config_show_command;

use crate::cli::InvokeContext;
use crate::cli::command::config::config_command::ConfigCommand;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;

#[derive(Args, Arbitrary, Default, PartialEq, Debug)]
pub struct ConfigArgs {
    #[clap(subcommand)]
    pub command: ConfigCommand,
}

impl ConfigArgs {
    /// # Errors
    ///
    /// Returns an error if the subcommand fails.
    pub fn invoke(self, context: &InvokeContext) -> eyre::Result<()> {
        self.command.invoke(context)
    }
}

impl ToArgs for ConfigArgs {
    fn to_args(&self) -> Vec<OsString> {
        self.command.to_args()
    }
}

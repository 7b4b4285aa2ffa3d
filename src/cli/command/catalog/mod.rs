pub mod catalog_command;
pub mod catalog_list_command;

use crate::cli::InvokeContext;
use crate::cli::command::catalog::catalog_command::CatalogCommand;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;

#[derive(Args, Arbitrary, PartialEq, Debug)]
pub struct CatalogArgs {
    #[clap(subcommand)]
    pub command: CatalogCommand,
}

impl CatalogArgs {
    /// # Errors
    ///
    /// Returns an error if the subcommand fails.
    pub fn invoke(self, context: &InvokeContext) -> eyre::Result<()> {
        self.command.invoke(context)
    }
}

impl ToArgs for CatalogArgs {
    fn to_args(&self) -> Vec<OsString> {
        self.command.to_args()
    }
}

use crate::cli::InvokeContext;
use crate::cli::command::catalog::catalog_list_command::CatalogListArgs;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Subcommand;
use std::ffi::OsString;

#[derive(Subcommand, Clone, Arbitrary, PartialEq, Debug)]
pub enum CatalogCommand {
    /// List every image under the configured keyword directories
    List(CatalogListArgs),
}

impl CatalogCommand {
    /// # Errors
    ///
    /// Returns an error if the subcommand fails.
    pub fn invoke(self, context: &InvokeContext) -> eyre::Result<()> {
        match self {
            CatalogCommand::List(args) => args.invoke(context),
        }
    }
}

impl ToArgs for CatalogCommand {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        match self {
            CatalogCommand::List(a) => {
                args.push("list".into());
                args.extend(a.to_args());
            }
        }
        args
    }
}

use crate::cli::InvokeContext;
use crate::cli::to_args::ToArgs;
use crate::config::ConfigFile;
use arbitrary::Arbitrary;
use clap::Args;
use facet_pretty::FacetPretty;
use std::ffi::OsString;

#[derive(Args, Arbitrary, Clone, PartialEq, Debug)]
pub struct ConfigShowArgs {}

impl ConfigShowArgs {
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded.
    pub fn invoke(self, context: &InvokeContext) -> eyre::Result<()> {
        let config = context.load_config()?;
        println!("{}", ConfigFile::from(&config).pretty());
        Ok(())
    }
}

impl ToArgs for ConfigShowArgs {
    fn to_args(&self) -> Vec<OsString> {
        Vec::new()
    }
}

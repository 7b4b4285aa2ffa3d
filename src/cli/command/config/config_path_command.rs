use crate::cli::InvokeContext;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;

#[derive(Args, Arbitrary, Clone, PartialEq, Debug)]
pub struct ConfigPathArgs {}

impl ConfigPathArgs {
    /// # Errors
    ///
    /// This command does not fail.
    pub fn invoke(self, context: &InvokeContext) -> eyre::Result<()> {
        println!("{}", context.config_path.display());
        Ok(())
    }
}

impl ToArgs for ConfigPathArgs {
    fn to_args(&self) -> Vec<OsString> {
        Vec::new()
    }
}

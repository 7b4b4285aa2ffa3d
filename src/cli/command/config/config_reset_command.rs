use crate::cli::InvokeContext;
use crate::cli::to_args::ToArgs;
use crate::config::write_defaults;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;

/// Overwrite the config file with the defaults
#[derive(Args, Arbitrary, Clone, PartialEq, Debug)]
pub struct ConfigResetArgs {}

impl ConfigResetArgs {
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn invoke(self, context: &InvokeContext) -> eyre::Result<()> {
        write_defaults(&context.config_path)?;
        println!("Reset config at {}", context.config_path.display());
        Ok(())
    }
}

impl ToArgs for ConfigResetArgs {
    fn to_args(&self) -> Vec<OsString> {
        Vec::new()
    }
}

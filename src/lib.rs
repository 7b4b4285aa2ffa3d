#![deny(clippy::disallowed_methods)]

pub mod app_home;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod html;
pub mod image_info;
pub mod plugins;
pub mod resolver;
pub mod sizing;
pub mod tracing;
pub mod trigger;

use crate::cli::Cli;
use clap::CommandFactory;
use clap::FromArgMatches;
pub use error::ImageError;
pub use image_info::ImageInfo;

pub fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::command();
    let cli = Cli::from_arg_matches(&cli.get_matches())?;

    crate::tracing::init_tracing(
        cli.global_args.log_level(),
        cli.global_args.log_filter.as_deref(),
        cli.global_args.json_log_behaviour(),
    )?;

    cli.invoke()?;
    Ok(())
}

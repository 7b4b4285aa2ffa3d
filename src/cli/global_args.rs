use crate::cli::json_log_behaviour::JsonLogBehaviour;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::Level;

#[derive(Args, Arbitrary, Default, PartialEq, Debug)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[clap(long, global = true)]
    pub debug: bool,

    /// Tracing filter directive, e.g. `chatimg::resolver=trace,info`
    #[clap(long, global = true)]
    #[arbitrary(value = None)]
    pub log_filter: Option<String>,

    /// Emit logs as JSON on stderr
    #[clap(long, global = true)]
    pub json: bool,

    /// Also append JSON log lines to this file
    #[clap(long, global = true)]
    #[arbitrary(value = None)]
    pub log_file: Option<PathBuf>,

    /// Use this config file instead of the one in the config directory
    #[clap(long, global = true)]
    #[arbitrary(value = None)]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    #[must_use]
    pub fn log_level(&self) -> Level {
        if self.debug { Level::DEBUG } else { Level::INFO }
    }

    #[must_use]
    pub fn json_log_behaviour(&self) -> JsonLogBehaviour {
        match (&self.log_file, self.json) {
            (Some(path), _) => JsonLogBehaviour::File(path.clone()),
            (None, true) => JsonLogBehaviour::Stderr,
            (None, false) => JsonLogBehaviour::None,
        }
    }
}

impl ToArgs for GlobalArgs {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        if self.debug {
            args.push("--debug".into());
        }
        if let Some(filter) = &self.log_filter {
            args.push("--log-filter".into());
            args.push(filter.into());
        }
        if self.json {
            args.push("--json".into());
        }
        if let Some(path) = &self.log_file {
            args.push("--log-file".into());
            args.push(path.clone().into_os_string());
        }
        if let Some(path) = &self.config {
            args.push("--config".into());
            args.push(path.clone().into_os_string());
        }
        args
    }
}

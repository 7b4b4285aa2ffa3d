use crate::cli::json_log_behaviour::JsonLogBehaviour;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global tracing subscriber.
///
/// Filter precedence: `log_filter`, then `RUST_LOG`, then `chatimg={level},warn`.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid, the log file cannot be
/// opened, or a subscriber is already installed.
pub fn init_tracing(
    level: Level,
    log_filter: Option<&str>,
    json_behaviour: JsonLogBehaviour,
) -> eyre::Result<()> {
    let filter = match log_filter {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(format!("chatimg={level},warn")))?,
    };

    let registry = tracing_subscriber::registry().with(filter);

    match json_behaviour {
        JsonLogBehaviour::None => {
            registry
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .try_init()?;
        }
        JsonLogBehaviour::Stderr => {
            registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        JsonLogBehaviour::File(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            registry
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .with(fmt::layer().json().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()?;
        }
    }
    Ok(())
}

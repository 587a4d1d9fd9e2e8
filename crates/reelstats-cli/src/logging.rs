use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber and routes `log` records into it.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init(json: bool) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_target(true)))
        .with((!json).then(|| fmt::layer().with_target(false)));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("failed to install tracing subscriber: {}", e))?;
    tracing_log::LogTracer::init().map_err(|e| format!("failed to bridge log records: {}", e))?;

    Ok(())
}

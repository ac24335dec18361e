//! Tracing bootstrap shared by the server binary and the CLI.

use shelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured filter. Calling this more than once is
/// harmless: later calls leave the first subscriber in place and return
/// `false`.
pub fn init(settings: &TelemetrySettings) -> bool {
    let filter = build_filter(settings);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match settings.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
            .is_ok(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::debug!(
            target: "shelf-telemetry",
            format = ?settings.log_format,
            "tracing subscriber installed"
        );
    }

    installed
}

fn build_filter(settings: &TelemetrySettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

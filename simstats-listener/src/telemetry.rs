use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a formatting subscriber unless the host already installed one
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init(default_filter: &str) {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if installed.is_err() {
        tracing::debug!("Keeping the host's tracing subscriber");
    }
}

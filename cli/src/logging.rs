use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// `-v`/`-vv` raise the default `warn` floor to `info`/`debug`. Honors
/// `RUST_LOG` if set, so a user can still narrow/widen per-module filters.
pub fn init(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
        .init();
}

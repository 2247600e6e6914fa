use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the tracing subscriber.
///
/// Events go to stderr so they never interleave with rendered tables on
/// stdout. `RUST_LOG` wins over the configured level.
pub fn initialize(default_level: &str) -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&log_level)?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;

    Ok(())
}

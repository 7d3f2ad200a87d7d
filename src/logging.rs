use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a compact stderr subscriber. `RUST_LOG` overrides `filter`.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();

    if let Err(e) = result {
        tracing::debug!("logging already initialised: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        init_logging("warn");
        init_logging("debug");
        tracing::info!("still logging");
    }
}

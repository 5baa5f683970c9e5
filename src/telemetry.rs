//! Tracing subscriber setup.
//!
//! The crate itself only emits `tracing` events; hosts that want output call
//! [`init`] once at startup. Verbosity maps to a default level, overridable
//! through the `TIDEMARK_LOG` env var (standard `EnvFilter` directives).

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_from_verbosity(verbosity).into())
        .with_env_var("TIDEMARK_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

fn level_from_verbosity(verbosity: u8) -> tracing::metadata::LevelFilter {
    match verbosity {
        0 => tracing::metadata::LevelFilter::ERROR,
        1 => tracing::metadata::LevelFilter::INFO,
        _ => tracing::metadata::LevelFilter::DEBUG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(
            level_from_verbosity(0),
            tracing::metadata::LevelFilter::ERROR
        );
        assert_eq!(level_from_verbosity(1), tracing::metadata::LevelFilter::INFO);
        assert_eq!(
            level_from_verbosity(9),
            tracing::metadata::LevelFilter::DEBUG
        );
    }
}

//! Tracing subscriber setup shared by the binaries.
//!
//! Logs go to stderr so they never interleave with the board drawn on stdout.
//! `RUST_LOG`, when set, takes precedence over the `-v` count.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("blokus={0},play={0},benchmark={0}", level_for(verbosity))));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "trace");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(1);
        init_tracing(3);
        tracing::info!("subscriber installed");
    }
}

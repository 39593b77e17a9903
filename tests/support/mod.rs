//! Shared test support: wires a `tracing` subscriber so the spans emitted
//! by `#[tracing::instrument]` are actually observed when running with
//! `RUST_LOG` set, instead of going nowhere.

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`, defaulting to
/// `info` when unset. Safe to call from every test: `try_init` is a no-op
/// if a subscriber is already installed.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
}

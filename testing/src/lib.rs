//! # Recast Testing
//!
//! Testing utilities and helpers for the Recast transcoding engine.
//!
//! This crate provides:
//! - Mock implementations of the `Source` and `Sink` capabilities
//! - A tracing initializer for tests that want engine logs
//!
//! ## Example
//!
//! ```
//! use recast_testing::mocks::MapSource;
//! use recast_core::Source;
//!
//! let source = MapSource::new().with("page", "2").with("tags", "a,b");
//! assert!(source.get("page").is_some());
//! assert!(source.get("missing").is_none());
//! ```

pub mod mocks;

/// Initialize a compact tracing subscriber for tests.
///
/// Honors `RUST_LOG`; repeated calls are harmless (later ones are ignored).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .compact()
        .try_init();
}

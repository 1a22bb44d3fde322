// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod config;
pub mod error;
pub mod key;
pub mod language;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod ui;

pub use error::TyprError;

/// Redraw interval while a session is running
pub const TICK_RATE_MS: u64 = 100;

//! Shared utilities for stockview
//!
//! Logging setup used by the `stockview` binary and by anything else that
//! wants the same subscriber configuration.

pub mod logging;

pub use logging::{DEFAULT_DIRECTIVE, init_tracing};

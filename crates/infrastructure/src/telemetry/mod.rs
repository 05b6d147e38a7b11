//! Log output
//!
//! Installs a `tracing` subscriber writing to stderr, so command output on
//! stdout stays machine-readable.

mod logging;

pub use logging::init_logging;

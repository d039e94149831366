//! Utility modules for the paygate-local crate.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`sig_down`] | Graceful shutdown signal handling |
//! | [`telemetry`] | Logging setup, with optional OTLP export behind the `telemetry` feature |
//!
//! # Example
//!
//! ```ignore
//! use paygate_local::util::SigDown;
//!
//! let sig_down = SigDown::try_new()?;
//! let token = sig_down.cancellation_token();
//! ```

pub mod sig_down;
pub mod telemetry;

pub use sig_down::*;
pub use telemetry::*;

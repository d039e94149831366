//! paygate server
//!
//! A runnable HTTP server around [`paygate_local::GatewayLocal`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration types and loading |
//! | [`run`] | Server initialization and runtime |
//!
//! # Running the Server
//!
//! ```bash
//! # Run with default configuration
//! cargo run --package paygate
//!
//! # Run with OTLP span export
//! cargo run --package paygate --features telemetry
//!
//! # Run with custom config
//! cargo run --package paygate -- --config /path/to/config.json
//! ```

pub mod config;
pub mod run;

pub use run::run;

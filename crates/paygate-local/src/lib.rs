#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! In-process payment gateway.
//!
//! This crate provides [`GatewayLocal`], a [`Gateway`](paygate_types::gateway::Gateway)
//! implementation that keeps accounts and the transaction ledger in memory and
//! simulates payment approval, together with the HTTP handlers that expose it.
//!
//! # Modules
//!
//! - [`gateway_local`] - Core gateway implementation
//! - [`store`] - Account store and append-only ledger
//! - [`payment`] - Payment validation and approval policy
//! - [`handlers`] - HTTP endpoints
//! - [`util`] - Utilities for graceful shutdown and telemetry
//!
//! # Example
//!
//! ```ignore
//! use paygate_local::{GatewayLocal, PaymentPolicy, handlers};
//! use paygate_types::catalog::Catalog;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = GatewayLocal::new(Catalog::default(), PaymentPolicy::AlwaysApprove);
//!     let app = handlers::app(Arc::new(gateway));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod gateway_local;
pub mod handlers;
pub mod payment;
pub mod store;
pub mod util;

pub use gateway_local::*;
pub use handlers::*;
pub use payment::{InvalidSuccessRate, PaymentPolicy};

//! Core types for the paygate simulated payment gateway.
//!
//! This crate holds the domain model shared by the in-process gateway and the
//! server binary. Nothing here moves money or talks to a payment network: a
//! "payment" is a format check of stored credentials followed by a recorded
//! [`Transaction`](transaction::Transaction).
//!
//! # Modules
//!
//! - [`account`] - Registered users, their selected [`PaymentMethod`](account::PaymentMethod) and stored credentials.
//! - [`catalog`] - Purchasable [`Item`](catalog::Item)s and the fixed [`Catalog`](catalog::Catalog).
//! - [`gateway`] - The [`Gateway`](gateway::Gateway) trait and the [`GatewayError`](gateway::GatewayError) taxonomy.
//! - [`mask`] - Masking of card and bank account numbers for output.
//! - [`proto`] - Request and response bodies of the HTTP surface.
//! - [`transaction`] - Recorded payment attempts and their outcome.
//! - [`util`] - Helper types such as [`Price`](util::Price).
//! - [`validation`] - Per-method format rules for stored credentials.

pub mod account;
pub mod catalog;
pub mod gateway;
pub mod mask;
pub mod proto;
pub mod transaction;
pub mod util;
pub mod validation;

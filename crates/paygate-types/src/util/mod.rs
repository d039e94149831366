//! Utility types for the paygate-types crate.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`price`] | Non-negative decimal prices parsed from human-readable input |

pub mod price;

pub use price::*;

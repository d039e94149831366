//! paygate HTTP entrypoint.
//!
//! Endpoints:
//! - `GET /` – Welcome banner
//! - `POST /api/register` – Create an account
//! - `POST /api/login` – Check credentials and return the account
//! - `GET /api/products` – List the catalog
//! - `POST /api/payment-method` – Select a payment method and store its credentials
//! - `POST /api/payment` – Purchase one item with the active method
//! - `POST /api/transactions` – The caller's transaction history
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `HOST`, `PORT` control binding address
//! - `PAYMENT_SUCCESS_RATE` sets the approval probability
//! - `RUST_LOG` filters log output; `OTEL_*` variables enable span export
//!   when built with the `telemetry` feature

use std::process;

use paygate::run;

#[tokio::main]
async fn main() {
    let result = run().await;
    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1)
    }
}

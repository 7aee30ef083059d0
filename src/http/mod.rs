// ============================================================================
// HTTP API - actix-web routes for the order workflows
// ============================================================================
//
// Routes:
// - POST /orders       create an order
// - GET  /orders/{id}  fetch an order with its line items
// - GET  /health       liveness
// - GET  /metrics      Prometheus scrape endpoint
//
// ============================================================================

mod handlers;
mod server;

pub use handlers::{configure, ApiError, AppState};
pub use server::start_server;

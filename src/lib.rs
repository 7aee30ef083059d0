// ============================================================================
// Order Service
// ============================================================================
//
// Order creation with inventory validation, and order lookup.
//
// Layout:
// - domain/  - customers, products, the order aggregate and its handlers
// - store/   - repository traits, PostgreSQL and in-memory backends, schema
// - http/    - actix-web routes
// - metrics/ - Prometheus metrics
// - config   - environment-based configuration
//
// ============================================================================

pub mod config;
pub mod domain;
pub mod http;
pub mod metrics;
pub mod store;

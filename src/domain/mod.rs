// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// This module contains the domain types and the order workflows.
// Each domain concept has its own subdirectory:
// - customer/ - Customer records (read-only from the order workflows)
// - product/  - Product price and stock records
// - order/    - Order aggregate, commands, errors and command handlers
//
// Storage is reached only through the traits in crate::store.
//
// ============================================================================

pub mod order;
pub mod customer;
pub mod product;

// ============================================================================
// Customer Domain
// ============================================================================
//
// Customers are owned by another part of the backend. The order workflows
// only need to know that a customer exists, so this module carries the
// record shape and nothing else.
//
// ============================================================================

pub mod value_objects;

pub use value_objects::*;

// ============================================================================
// Product Domain
// ============================================================================
//
// Products are owned by the catalogue. Orders read the current price and
// available stock, and request stock decrements through the store.
//
// ============================================================================

pub mod value_objects;

pub use value_objects::*;

// ============================================================================
// Order Domain - Business Logic for the Order Aggregate
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (RequestedProduct, NewOrderLine, OrderLineItem)
// - Commands (CreateOrder, FindOrder)
// - Errors (OrderError enum)
// - Aggregate (Order, NewOrder and the stock validation rules)
// - Command Handlers (CreateOrderHandler, FindOrderHandler)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use command_handler::*;

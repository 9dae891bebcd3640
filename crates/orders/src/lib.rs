//! Orders domain module.
//!
//! Customer orders as the admin client sees them, and the fixed status
//! vocabulary (no IO, no HTTP, no storage).

pub mod order;

pub use order::{Order, OrderItem, OrderStatus, ShippingAddress};

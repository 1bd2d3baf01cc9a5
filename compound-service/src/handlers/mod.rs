//! HTTP handlers for the compound service.

pub mod compound;
pub mod health;

pub use compound::generate_compound;
pub use health::{health_check, metrics, not_found};

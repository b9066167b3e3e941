//! API Module
//!
//! HTTP handlers and routing exposing the patient cache for operations and
//! diagnostics.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

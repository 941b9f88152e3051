//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ListingsAppState;
pub use router::{listings_router, listings_router_generic};

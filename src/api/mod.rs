//! API Module
//!
//! HTTP handler and routing for the lookup API.
//!
//! # Endpoints
//! - `GET /api?url=<share-link>` - Resolve a share link to name and size

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

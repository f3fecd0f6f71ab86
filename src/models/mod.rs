//! Request and Response models for the lookup API
//!
//! This module defines the DTOs used for deserializing the query string
//! and serializing JSON response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ApiQuery;
pub use responses::ApiResponse;

//! megasize - MEGA share-link metadata service
//!
//! Reports the name and size of a shared file, rejecting files above 5 GiB,
//! with lookups cached for an hour in Redis or in process.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod resolver;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use lookup::{LookupService, CACHE_TTL, MAX_FILE_SIZE};
pub use tasks::spawn_cleanup_task;

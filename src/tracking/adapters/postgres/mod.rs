//! `PostgreSQL` adapters for tracked-work persistence.

mod convert;
mod errors;
mod models;
mod repository;
pub(crate) mod schema;

pub(crate) use errors::{map_diesel_error, map_pool_error};
pub use repository::PostgresTrackingRepository;

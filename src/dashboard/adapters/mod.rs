//! Adapter implementations of [`super::ports::DashboardQueries`].

pub mod memory;
pub mod postgres;

pub use postgres::PostgresDashboardQueries;

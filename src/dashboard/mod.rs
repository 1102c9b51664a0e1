//! Read-only dashboard over the tracking tables.
//!
//! One page shows the task count and summed cost, task counts per status,
//! and the most recent agent activity. The three figures are gathered
//! concurrently on every render; nothing is cached between requests.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod render;
pub mod server;
pub mod services;

#[cfg(test)]
mod tests;

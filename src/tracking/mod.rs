//! Tracked work: tasks, their subtasks and dependency edges, the agent
//! activity log, and synced experiment traces.
//!
//! The module follows the hexagonal layout used across the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

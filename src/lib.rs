//! Taskboard: task tracking storage and a read-only dashboard.
//!
//! The crate holds the schema and typed data access for tasks, subtasks,
//! dependency edges, agent activity events and synced experiment traces,
//! plus a server-rendered page summarising them.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`, memory)
//!
//! # Modules
//!
//! - [`tracking`]: Tracked-work domain, repositories and write services
//! - [`dashboard`]: Aggregate queries, HTML rendering and the HTTP router
//! - [`database`]: Connection pooling and embedded migrations
//! - [`config`]: Command-line and environment configuration
//! - [`logging`]: Tracing subscriber setup

pub mod config;
pub mod dashboard;
pub mod database;
pub mod logging;
pub mod tracking;

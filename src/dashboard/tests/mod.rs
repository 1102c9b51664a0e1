//! Unit tests for the dashboard module.

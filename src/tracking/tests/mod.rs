//! Unit tests for the tracking module.

mod domain_tests;

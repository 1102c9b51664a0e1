//! In-memory adapters for tracking tests and local runs.

mod tracking;

pub use tracking::InMemoryTrackingRepository;

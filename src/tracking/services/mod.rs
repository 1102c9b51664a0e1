//! Application services for tracked work.

mod recorder;
mod seed;
mod tracking;

pub use recorder::{ActivityRecorder, HookContext, MAX_IN_FLIGHT_TOOLS};
pub use seed::{SeedSummary, seed_sample_data};
pub use tracking::{TaskTrackingService, TrackingServiceError, TrackingServiceResult};

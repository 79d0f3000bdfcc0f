pub mod refresh_service;
pub mod scheduler;

pub use refresh_service::{RefreshOptions, RefreshService, RefreshStats};
pub use scheduler::RefreshScheduler;

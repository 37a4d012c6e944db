//! Thread-bound execution contexts and the schedulers that target them.

/// Context configuration and environment overrides.
pub mod config;
mod context;
mod scheduler;

pub use config::ContextConfig;
pub use context::{Context, make_context};
pub use scheduler::{Schedule, ScheduleOperation, Scheduler, schedule};

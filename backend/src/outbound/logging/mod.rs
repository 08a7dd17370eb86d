//! Logging outbound adapters.

mod tracing_logger;

pub use tracing_logger::TracingActionLogger;

//! API middleware components

pub mod hostname;
pub mod logging;
pub mod metrics;

pub use hostname::RequestHostname;
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;

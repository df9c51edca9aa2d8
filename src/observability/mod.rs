//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing + http subsystems produce:
//!     → tracing events (registration, mounts, constraint rejections)
//!     → tower-http TraceLayer spans per request (server.rs)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```

pub mod logging;

pub use logging::init_logging;

//! Named routes and reverse URL building.
//!
//! # Data Flow
//! ```text
//! Route declaration (at startup):
//!     pattern "/foo/{bar:[a-z-]+}/*"
//!     → pattern.rs (placeholder spans + constraints)
//!     → registry.rs (prefix composition, name → NamedRoute)
//!
//! Mount (at startup):
//!     sub-router registry
//!     → registry.rs (re-key under prefix + mount pattern)
//!
//! Reverse lookup (at serve time):
//!     name + params
//!     → builder.rs (pair params, splice path, encode query)
//!     → "/foo/value/wild/card?q=1"
//! ```
//!
//! # Design Decisions
//! - Registry is frozen behind `Arc` once startup completes (`Urls`)
//! - Routes that are never named are simply absent
//! - Inline regex constraints are enforced by the router, not the builder

pub mod builder;
pub mod error;
pub mod pattern;
pub mod registry;
pub mod urls;

pub use builder::{build_path, Param, QueryParams};
pub use error::{BuildError, RegistryError};
pub use pattern::{compile_rules, concat_prefix, Template};
pub use registry::{CollisionPolicy, NamedRoute, RouteRegistry};
pub use urls::Urls;

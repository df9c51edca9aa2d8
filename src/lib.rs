//! Named routes and reverse URL building for axum.
//!
//! Routes are declared through [`Mux`], optionally named, and later turned
//! back into concrete paths with [`Urls::build_path`].
//!
//! ```
//! use reverse_router::{Mux, Routes};
//!
//! let mut mux: Mux = Mux::new();
//! mux.get("/foo/{bar:[a-z-]+}/*", || async { "ok" }).name("foo");
//!
//! let path = mux.build_path("foo", ["bar", "value", "*", "wild/card"]).unwrap();
//! assert_eq!(path, "/foo/value/wild/card");
//! ```

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::{Mux, NameHandle, Routes, Scope};
pub use routing::{BuildError, Param, QueryParams, RegistryError, RouteRegistry, Urls};

//! Router facade over `axum::Router`.
//!
//! # Data Flow
//! ```text
//! Declaration (at startup):
//!     mux.get("/foo/{bar:[a-z-]+}/*", handler)
//!     → syntax.rs ("/foo/{bar}/{*wildcard}" handed to axum)
//!     → constraint.rs (route_layer checking `bar` per request)
//!     → NameHandle::name("foo") → routing registry
//!
//! Startup complete:
//!     Mux::into_router()
//!     → axum::Router + Extension<Urls>
//! ```

pub mod constraint;
pub mod mux;
pub mod server;
pub mod syntax;

pub use mux::{Mux, NameHandle, Routes, Scope};
pub use server::{serve, serve_with_shutdown};

//! Shared, frozen view of the named routes.

use std::sync::Arc;

use axum::http::Method;

use crate::routing::builder::{build_path, Param};
use crate::routing::error::BuildError;
use crate::routing::registry::{NamedRoute, RouteRegistry};

/// Read-only handle to a finished registry.
///
/// Cheap to clone; handlers receive it through `Extension<Urls>`.
#[derive(Debug, Clone, Default)]
pub struct Urls {
    registry: Arc<RouteRegistry>,
}

impl Urls {
    pub fn new(registry: RouteRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Build the path of the route registered as `name`.
    pub fn build_path<I>(&self, name: &str, params: I) -> Result<String, BuildError>
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        build_path(&self.registry, name, params)
    }

    /// Like [`Urls::build_path`], for call sites where a broken named route
    /// is a bug.
    ///
    /// # Panics
    ///
    /// Panics if the path cannot be built.
    pub fn path<I>(&self, name: &str, params: I) -> String
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        match self.build_path(name, params) {
            Ok(path) => path,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn route_name(&self, method: Option<&Method>, pattern: &str) -> Option<&str> {
        self.registry.route_name(method, pattern)
    }

    pub fn get(&self, name: &str) -> Option<&NamedRoute> {
        self.registry.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamedRoute)> {
        self.registry.iter()
    }
}

impl From<RouteRegistry> for Urls {
    fn from(registry: RouteRegistry) -> Self {
        Self::new(registry)
    }
}

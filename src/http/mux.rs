//! Router facade with named routes.
//!
//! # Responsibilities
//! - Forward every declaration to the wrapped `axum::Router`
//! - Hand back a `NameHandle` so the route can be named afterwards
//! - Compose registries when sub-routers are mounted
//!
//! # Design Decisions
//! - `Mux` owns the registry; `Scope`s borrow it and carry their own prefix
//! - Declaration errors panic, matching axum's own route registration
//! - Dispatch and middleware stay entirely with axum

use std::convert::Infallible;
use std::mem;

use axum::{
    extract::Request,
    handler::Handler,
    http::Method,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{self, MethodFilter, MethodRouter},
    Extension, Router,
};
use tower::Service;

use crate::http::constraint::{constraint_middleware, Constraints};
use crate::http::syntax::{nest_path, to_axum_path};
use crate::routing::builder::{build_path, Param};
use crate::routing::error::{BuildError, RegistryError};
use crate::routing::pattern::{extract_name, Template};
use crate::routing::registry::{CollisionPolicy, RouteRegistry};
use crate::routing::urls::Urls;

/// Mutable state a declaration touches.
#[doc(hidden)]
pub struct Parts<'a, S> {
    router: &'a mut Router<S>,
    registry: &'a mut RouteRegistry,
    prefix: &'a Template,
}

/// Deferred naming of a freshly declared route.
#[derive(Debug)]
pub struct NameHandle<'a> {
    registry: &'a mut RouteRegistry,
    prefix: &'a Template,
    method: Option<Method>,
    pattern: String,
}

impl NameHandle<'_> {
    /// Register the route as `name`.
    ///
    /// A pattern that does not compile stays unnamed; the router reports it.
    ///
    /// # Panics
    ///
    /// Panics if the name is taken and the collision policy is `Reject`.
    pub fn name(mut self, name: &str) {
        self.apply(name);
    }

    /// Register the route as `name`, returning any registry error.
    pub fn try_name(self, name: &str) -> Result<(), RegistryError> {
        self.registry
            .name_route(name, self.method, self.prefix, &self.pattern)
    }

    /// Declared pattern including the enclosing prefix.
    pub fn full_pattern(&self) -> String {
        self.prefix
            .join(&Template::literal(&self.pattern))
            .pattern()
            .to_string()
    }

    fn apply(&mut self, name: &str) {
        let result = self
            .registry
            .name_route(name, self.method.clone(), self.prefix, &self.pattern);
        match result {
            Ok(()) => {}
            Err(RegistryError::InvalidPattern(pattern)) => {
                tracing::warn!(name = %name, pattern = %pattern, "Route pattern is invalid, name ignored");
            }
            Err(err) => panic!("{err}"),
        }
    }
}

/// Declaration surface shared by [`Mux`] and [`Scope`].
pub trait Routes<S>
where
    S: Clone + Send + Sync + 'static,
{
    #[doc(hidden)]
    fn parts(&mut self) -> Parts<'_, S>;

    /// Route any method to `method_router`.
    fn route(&mut self, pattern: &str, method_router: MethodRouter<S>) -> NameHandle<'_> {
        declare(self.parts(), None, pattern, method_router)
    }

    /// Route any method to a tower service.
    fn route_service<T>(&mut self, pattern: &str, service: T) -> NameHandle<'_>
    where
        T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        T::Response: IntoResponse + 'static,
        T::Future: Send + 'static,
    {
        declare(self.parts(), None, pattern, routing::any_service(service))
    }

    /// Route a single method to `handler`.
    fn method<H, T>(&mut self, method: Method, pattern: &str, handler: H) -> NameHandle<'_>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let filter = match MethodFilter::try_from(method.clone()) {
            Ok(filter) => filter,
            Err(err) => panic!("{err}"),
        };
        declare(self.parts(), Some(method), pattern, routing::on(filter, handler))
    }

    fn get<H: Handler<T, S>, T: 'static>(&mut self, pattern: &str, handler: H) -> NameHandle<'_> {
        self.method(Method::GET, pattern, handler)
    }

    fn post<H: Handler<T, S>, T: 'static>(&mut self, pattern: &str, handler: H) -> NameHandle<'_> {
        self.method(Method::POST, pattern, handler)
    }

    fn put<H: Handler<T, S>, T: 'static>(&mut self, pattern: &str, handler: H) -> NameHandle<'_> {
        self.method(Method::PUT, pattern, handler)
    }

    fn delete<H: Handler<T, S>, T: 'static>(&mut self, pattern: &str, handler: H) -> NameHandle<'_> {
        self.method(Method::DELETE, pattern, handler)
    }

    fn patch<H: Handler<T, S>, T: 'static>(&mut self, pattern: &str, handler: H) -> NameHandle<'_> {
        self.method(Method::PATCH, pattern, handler)
    }

    fn head<H: Handler<T, S>, T: 'static>(&mut self, pattern: &str, handler: H) -> NameHandle<'_> {
        self.method(Method::HEAD, pattern, handler)
    }

    fn options<H: Handler<T, S>, T: 'static>(&mut self, pattern: &str, handler: H) -> NameHandle<'_> {
        self.method(Method::OPTIONS, pattern, handler)
    }

    fn trace<H: Handler<T, S>, T: 'static>(&mut self, pattern: &str, handler: H) -> NameHandle<'_> {
        self.method(Method::TRACE, pattern, handler)
    }

    fn connect<H: Handler<T, S>, T: 'static>(&mut self, pattern: &str, handler: H) -> NameHandle<'_> {
        self.method(Method::CONNECT, pattern, handler)
    }

    /// Declare routes in a child scope with the same prefix. Names land in
    /// the shared registry.
    fn group<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Scope<'_, S>),
    {
        let parts = self.parts();
        let mut scope = Scope::new(parts.registry, parts.prefix.clone());
        f(&mut scope);
        *parts.router = mem::take(parts.router).merge(scope.router);
    }

    /// Declare routes below `pattern`, like mounting a fresh sub-router.
    fn nest<F>(&mut self, pattern: &str, f: F)
    where
        F: FnOnce(&mut Scope<'_, S>),
    {
        let parts = self.parts();
        let own = Template::mount_point(pattern);
        let mut scope = Scope::new(parts.registry, parts.prefix.join(&own));
        f(&mut scope);
        *parts.router = nest_router(mem::take(parts.router), pattern, scope.router);
    }

    /// Mount `sub` at `pattern`, merging its named routes under the
    /// composed prefix.
    ///
    /// # Panics
    ///
    /// Panics if a merged name is rejected by the collision policy.
    fn mount(&mut self, pattern: &str, sub: Mux<S>) {
        let parts = self.parts();
        tracing::debug!(
            pattern = %pattern,
            prefix = %parts.prefix.pattern(),
            named = sub.registry.len(),
            "Mounting sub-router"
        );
        if let Err(err) = parts
            .registry
            .merge_mounted(parts.prefix, pattern, sub.registry)
        {
            panic!("{err}");
        }
        *parts.router = nest_router(mem::take(parts.router), pattern, sub.router);
    }

    /// Mount an opaque service at `pattern`. It contributes no names.
    fn mount_service<T>(&mut self, pattern: &str, service: T)
    where
        T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        T::Response: IntoResponse,
        T::Future: Send + 'static,
    {
        let parts = self.parts();
        let router = mem::take(parts.router);
        *parts.router = match nest_path(pattern) {
            Some(path) => router.nest_service(&path, service),
            None => router.fallback_service(service),
        };
    }

    /// Apply `f` to the wrapped router, e.g. to add a `route_layer` to the
    /// routes declared so far.
    fn map_router<F>(&mut self, f: F)
    where
        F: FnOnce(Router<S>) -> Router<S>,
    {
        let parts = self.parts();
        *parts.router = f(mem::take(parts.router));
    }
}

fn declare<'a, S>(
    parts: Parts<'a, S>,
    method: Option<Method>,
    pattern: &str,
    method_router: MethodRouter<S>,
) -> NameHandle<'a>
where
    S: Clone + Send + Sync + 'static,
{
    let (inline_name, pattern) = extract_name(pattern);
    let path = to_axum_path(pattern);
    let method_router = match Constraints::for_pattern(pattern) {
        Some(constraints) => {
            method_router.route_layer(from_fn_with_state(constraints, constraint_middleware))
        }
        None => method_router,
    };

    tracing::debug!(
        method = ?method,
        pattern = %pattern,
        path = %path,
        "Route declared"
    );
    *parts.router = mem::take(parts.router).route(&path, method_router);

    let mut handle = NameHandle {
        registry: parts.registry,
        prefix: parts.prefix,
        method,
        pattern: pattern.to_string(),
    };
    if let Some(name) = inline_name {
        handle.apply(name);
    }
    handle
}

fn nest_router<S>(parent: Router<S>, pattern: &str, child: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let child = match Constraints::for_pattern(pattern) {
        Some(constraints) => child.layer(from_fn_with_state(constraints, constraint_middleware)),
        None => child,
    };
    match nest_path(pattern) {
        Some(path) => parent.nest(&path, child),
        None => parent.merge(child),
    }
}

/// Root router: owns the wrapped `axum::Router` and the name registry.
pub struct Mux<S = ()> {
    router: Router<S>,
    registry: RouteRegistry,
    prefix: Template,
}

impl<S> Mux<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_registry(RouteRegistry::new())
    }

    pub fn with_policy(policy: CollisionPolicy) -> Self {
        Self::with_registry(RouteRegistry::with_policy(policy))
    }

    /// Start from an existing registry, e.g. one built from configuration.
    pub fn with_registry(registry: RouteRegistry) -> Self {
        Self {
            router: Router::new(),
            registry,
            prefix: Template::default(),
        }
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn build_path<I>(&self, name: &str, params: I) -> Result<String, BuildError>
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        build_path(&self.registry, name, params)
    }

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

    /// Finish startup: the wrapped router plus the frozen registry.
    pub fn into_parts(self) -> (Router<S>, Urls) {
        tracing::info!(named_routes = self.registry.len(), "Route registry frozen");
        (self.router, Urls::new(self.registry))
    }

    /// The wrapped router with `Extension<Urls>` available to handlers.
    pub fn into_router(self) -> Router<S> {
        let (router, urls) = self.into_parts();
        router.layer(Extension(urls))
    }
}

impl<S> Default for Mux<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Routes<S> for Mux<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn parts(&mut self) -> Parts<'_, S> {
        Parts {
            router: &mut self.router,
            registry: &mut self.registry,
            prefix: &self.prefix,
        }
    }
}

/// Child facade created by [`Routes::group`] and [`Routes::nest`].
pub struct Scope<'a, S = ()> {
    router: Router<S>,
    registry: &'a mut RouteRegistry,
    prefix: Template,
}

impl<'a, S> Scope<'a, S>
where
    S: Clone + Send + Sync + 'static,
{
    fn new(registry: &'a mut RouteRegistry, prefix: Template) -> Self {
        Self {
            router: Router::new(),
            registry,
            prefix,
        }
    }

    /// Pattern prefix accumulated by enclosing `nest` calls.
    pub fn prefix(&self) -> &str {
        self.prefix.pattern()
    }
}

impl<S> Routes<S> for Scope<'_, S>
where
    S: Clone + Send + Sync + 'static,
{
    fn parts(&mut self) -> Parts<'_, S> {
        Parts {
            router: &mut self.router,
            registry: &mut *self.registry,
            prefix: &self.prefix,
        }
    }
}

//! Named route storage and mount composition.
//!
//! # Responsibilities
//! - Store one `NamedRoute` per name
//! - Index names by `(method, full pattern)` for reverse lookup
//! - Re-key a mounted sub-router's routes under the composed prefix
//!
//! # Design Decisions
//! - Built during startup, immutable once shared
//! - Name collisions follow the configured `CollisionPolicy`
//! - Routes are kept ordered by name so listings are deterministic

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::config::RouteConfig;
use crate::routing::error::RegistryError;
use crate::routing::pattern::Template;

/// What to do when a name is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Last write wins silently.
    #[default]
    Overwrite,
    /// Last write wins, with a warning.
    Warn,
    /// Keep the first registration and report an error.
    Reject,
}

/// A route registered under a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRoute {
    method: Option<Method>,
    template: Template,
}

impl NamedRoute {
    pub fn new(method: Option<Method>, template: Template) -> Self {
        Self { method, template }
    }

    /// The method the route was declared for; `None` matches any.
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Full pattern including every mount prefix.
    pub fn pattern(&self) -> &str {
        self.template.pattern()
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Names of the path parameters, wildcard included.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.template.rules().keys().map(String::as_str)
    }
}

type ReverseKey = (Option<Method>, String);

/// Name → route mapping plus the reverse `(method, pattern)` index.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: BTreeMap<String, NamedRoute>,
    names: HashMap<ReverseKey, String>,
    policy: CollisionPolicy,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Build a registry from statically configured routes.
    pub fn from_config(
        routes: &[RouteConfig],
        policy: CollisionPolicy,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::with_policy(policy);
        for route in routes {
            let method = route
                .method
                .as_deref()
                .map(|m| {
                    Method::from_str(&m.to_ascii_uppercase())
                        .map_err(|_| RegistryError::InvalidMethod(m.to_string()))
                })
                .transpose()?;
            registry.name_route(&route.name, method, &Template::default(), &route.pattern)?;
        }
        Ok(registry)
    }

    /// Register `pattern`, declared under `prefix`, as `name`.
    pub fn name_route(
        &mut self,
        name: &str,
        method: Option<Method>,
        prefix: &Template,
        pattern: &str,
    ) -> Result<(), RegistryError> {
        let own = Template::compile(pattern)
            .ok_or_else(|| RegistryError::InvalidPattern(pattern.to_string()))?;
        self.insert(name, NamedRoute::new(method, prefix.join(&own)))
    }

    /// Insert a route, applying the collision policy.
    pub fn insert(&mut self, name: &str, route: NamedRoute) -> Result<(), RegistryError> {
        if let Some(existing) = self.routes.get(name) {
            match self.policy {
                CollisionPolicy::Reject => {
                    return Err(RegistryError::DuplicateName {
                        name: name.to_string(),
                        existing: existing.pattern().to_string(),
                    });
                }
                CollisionPolicy::Warn => {
                    tracing::warn!(
                        name = %name,
                        previous = %existing.pattern(),
                        pattern = %route.pattern(),
                        "Route name overwritten"
                    );
                }
                CollisionPolicy::Overwrite => {}
            }
        }

        tracing::debug!(
            name = %name,
            method = ?route.method,
            pattern = %route.pattern(),
            params = route.template.param_count(),
            "Named route registered"
        );

        let key = (route.method.clone(), route.pattern().to_string());
        if let Some(previous) = self.routes.insert(name.to_string(), route) {
            let stale = (previous.method, previous.template.pattern().to_string());
            if self.names.get(&stale).is_some_and(|n| n == name) {
                self.names.remove(&stale);
            }
        }
        self.names.insert(key, name.to_string());
        Ok(())
    }

    /// Merge the named routes of a router mounted at `mount_pattern`.
    ///
    /// Rules compose in the order prefix, mount pattern, sub-route, so the
    /// most deeply nested rule wins on a parameter name collision.
    pub fn merge_mounted(
        &mut self,
        prefix: &Template,
        mount_pattern: &str,
        sub: RouteRegistry,
    ) -> Result<(), RegistryError> {
        let base = prefix.join(&Template::mount_point(mount_pattern));
        for (name, route) in sub.routes {
            let template = base.join(&route.template);
            self.insert(&name, NamedRoute::new(route.method, template))?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&NamedRoute> {
        self.routes.get(name)
    }

    /// Name registered for `method` and `pattern`, if any.
    pub fn route_name(&self, method: Option<&Method>, pattern: &str) -> Option<&str> {
        self.names
            .get(&(method.cloned(), pattern.to_string()))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamedRoute)> {
        self.routes.iter().map(|(name, route)| (name.as_str(), route))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

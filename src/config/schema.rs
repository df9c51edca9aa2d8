//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::CollisionPolicy;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration for the demo server.
    pub listener: ListenerConfig,

    /// Named route registration behavior.
    pub naming: NamingConfig,

    /// Statically named routes, e.g. links served by another service.
    pub routes: Vec<RouteConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Named route registration behavior.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingConfig {
    /// What happens when a name is registered twice.
    pub on_collision: CollisionPolicy,
}

/// A named route declared in configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Name used for reverse lookup.
    pub name: String,

    /// HTTP method; absent means any.
    #[serde(default)]
    pub method: Option<String>,

    /// Route pattern, e.g. "/docs/{section}/*".
    pub pattern: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter used when RUST_LOG is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "reverse_router=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        assert_eq!(config.naming.on_collision, CollisionPolicy::Overwrite);
        assert!(config.routes.is_empty());
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_full_config() {
        let config: RouterConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "0.0.0.0:3000"

            [naming]
            on_collision = "reject"

            [observability]
            log_level = "debug"
            log_format = "json"

            [[routes]]
            name = "docs"
            method = "GET"
            pattern = "/docs/{section}/*"

            [[routes]]
            name = "home"
            pattern = "/"
            "#,
        )
        .unwrap();

        assert_eq!(config.naming.on_collision, CollisionPolicy::Reject);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].method.as_deref(), Some("GET"));
        assert_eq!(config.routes[1].method, None);
    }
}

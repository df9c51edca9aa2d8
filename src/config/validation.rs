//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject route patterns the compiler cannot parse
//! - Detect duplicate names when the collision policy rejects them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::{compile_rules, CollisionPolicy};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("route #{0} has an empty name")]
    EmptyName(usize),

    #[error("route '{0}' is declared more than once")]
    DuplicateName(String),

    #[error("route '{name}' has invalid method '{method}'")]
    Method { name: String, method: String },

    #[error("route '{name}' pattern '{pattern}' must start with '/'")]
    Relative { name: String, pattern: String },

    #[error("route '{name}' pattern '{pattern}' has unbalanced braces")]
    Unbalanced { name: String, pattern: String },
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if SocketAddr::from_str(&config.listener.bind_address).is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let mut seen = HashSet::new();
    for (i, route) in config.routes.iter().enumerate() {
        if route.name.is_empty() {
            errors.push(ValidationError::EmptyName(i));
        } else if !seen.insert(route.name.as_str())
            && config.naming.on_collision == CollisionPolicy::Reject
        {
            errors.push(ValidationError::DuplicateName(route.name.clone()));
        }

        if let Some(method) = &route.method {
            if Method::from_str(&method.to_ascii_uppercase()).is_err() {
                errors.push(ValidationError::Method {
                    name: route.name.clone(),
                    method: method.clone(),
                });
            }
        }

        if !route.pattern.starts_with('/') {
            errors.push(ValidationError::Relative {
                name: route.name.clone(),
                pattern: route.pattern.clone(),
            });
        }

        if compile_rules(&route.pattern).is_none() {
            errors.push(ValidationError::Unbalanced {
                name: route.name.clone(),
                pattern: route.pattern.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

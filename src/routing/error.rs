//! Error definitions for naming routes and building paths.

use thiserror::Error;

/// Errors raised while registering named routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The name is already taken and the collision policy rejects overwrites.
    #[error("route name '{name}' is already registered for '{existing}'")]
    DuplicateName { name: String, existing: String },

    /// Unbalanced or empty placeholder braces.
    #[error("invalid route pattern '{0}'")]
    InvalidPattern(String),

    /// A configured method string is not an HTTP method.
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),
}

/// Errors raised while building a path from a route name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// No route was registered under this name.
    #[error("route '{0}' not found")]
    RouteNotFound(String),

    /// A flat parameter sequence had an odd number of elements.
    #[error("number of parameters must be even, got {0}")]
    OddPairs(usize),

    /// A bare key was not immediately followed by a bare value.
    #[error("parameter '{0}' has no value")]
    DanglingKey(String),

    /// Some declared path parameters were never supplied.
    #[error("route '{route}' is missing parameters: {}", missing.join(", "))]
    MissingParams { route: String, missing: Vec<String> },

    /// A dynamic parameter value was not a string, string list or query map.
    #[error("unsupported parameter type: {0}")]
    UnsupportedParamType(&'static str),
}

impl BuildError {
    /// True for errors caused by the shape of the parameter list.
    pub fn is_malformed(&self) -> bool {
        matches!(self, BuildError::OddPairs(_) | BuildError::DanglingKey(_))
    }
}

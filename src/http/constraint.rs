//! Inline regex constraints for path parameters.
//! Enforced per request, after axum has matched the route.

use std::sync::Arc;

use axum::{
    extract::{RawPathParams, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use regex::Regex;

use crate::routing::pattern::Template;

/// Anchored regexes keyed by parameter name.
#[derive(Debug, Clone)]
pub struct Constraints {
    checks: Arc<Vec<(String, Regex)>>,
}

impl Constraints {
    /// Collect the constrained parameters of `template`; `Ok(None)` when
    /// there are none.
    pub fn from_template(template: &Template) -> Result<Option<Self>, regex::Error> {
        let mut checks = Vec::new();
        for (name, rule) in template.rules() {
            if let Some(constraint) = rule.constraint() {
                checks.push((name.clone(), anchored(constraint)?));
            }
        }
        if checks.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            checks: Arc::new(checks),
        }))
    }

    /// Constraints declared by `pattern`.
    ///
    /// # Panics
    ///
    /// Panics if an inline regex does not compile, the same way the router
    /// rejects malformed routes at declaration.
    pub fn for_pattern(pattern: &str) -> Option<Self> {
        let template = Template::compile(pattern)?;
        match Self::from_template(&template) {
            Ok(constraints) => constraints,
            Err(err) => panic!("invalid parameter constraint in route '{pattern}': {err}"),
        }
    }

    /// First parameter whose value violates its constraint.
    pub fn violation<'a, I>(&self, params: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        params.into_iter().find_map(|(key, value)| {
            self.checks
                .iter()
                .any(|(name, regex)| name == key && !regex.is_match(value))
                .then_some(key)
        })
    }
}

fn anchored(constraint: &str) -> Result<Regex, regex::Error> {
    let start = if constraint.starts_with('^') { "" } else { "^" };
    let end = if constraint.ends_with('$') { "" } else { "$" };
    Regex::new(&format!("{start}(?:{constraint}){end}"))
}

/// Rejects requests whose path parameters do not satisfy their constraint.
pub async fn constraint_middleware(
    State(constraints): State<Constraints>,
    params: RawPathParams,
    req: Request,
    next: Next,
) -> Response {
    if let Some(param) = constraints.violation(&params) {
        tracing::debug!(
            param = %param,
            path = %req.uri().path(),
            "Path parameter failed its constraint"
        );
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(req).await
}

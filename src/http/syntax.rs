//! Translation of route patterns into axum path syntax.
//!
//! axum captures are plain `{name}` segments and catch-alls are spelled
//! `{*name}`, so inline regexes are dropped here (they are enforced by
//! `constraint.rs`) and a trailing `/*` becomes `/{*wildcard}`.

use crate::routing::pattern::{concat_prefix, Template, WILDCARD};

/// Capture name of the trailing wildcard in the axum route.
pub const WILDCARD_PARAM: &str = "wildcard";

/// Rewrite `pattern` for axum. Patterns that do not compile are returned
/// unchanged so axum reports the error at registration.
pub fn to_axum_path(pattern: &str) -> String {
    let Some(template) = Template::compile(pattern) else {
        return pattern.to_string();
    };

    let mut out = String::with_capacity(pattern.len());
    let mut cursor = 0;
    for (span, name) in template.placeholders() {
        if span.start < cursor {
            continue;
        }
        let replacement = if name == WILDCARD {
            if !pattern[..span.start].ends_with('/') {
                continue;
            }
            format!("{{*{WILDCARD_PARAM}}}")
        } else {
            format!("{{{name}}}")
        };
        out.push_str(&pattern[cursor..span.start]);
        out.push_str(&replacement);
        cursor = span.end;
    }
    out.push_str(&pattern[cursor..]);
    out
}

/// Path used to nest a sub-router at `pattern`, or `None` for the root,
/// which axum only accepts through `merge`.
pub fn nest_path(pattern: &str) -> Option<String> {
    let path = to_axum_path(&concat_prefix("", pattern));
    if path.is_empty() || path == "/" {
        None
    } else {
        Some(path)
    }
}

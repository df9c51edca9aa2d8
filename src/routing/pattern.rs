//! Route pattern compilation.
//!
//! # Responsibilities
//! - Parse `{name}` / `{name:regex}` placeholders and the trailing `*`
//! - Record the byte range of every placeholder occurrence
//! - Concatenate prefixes the way mounted routers compose them
//!
//! # Design Decisions
//! - Substitution splices by offset, never re-matches the pattern text
//! - Unbalanced braces yield `None`; the wrapped router reports the error
//! - Nested braces inside an inline regex are skipped by depth counting

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

/// Parameter name of the trailing wildcard.
pub const WILDCARD: &str = "*";

/// Substitution rules of a pattern keyed by parameter name.
pub type Rules = BTreeMap<String, Rule>;

/// Where a single parameter appears in a pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    spans: Vec<Range<usize>>,
    constraint: Option<String>,
}

impl Rule {
    fn new(span: Range<usize>, constraint: Option<String>) -> Self {
        Self {
            spans: vec![span],
            constraint,
        }
    }

    /// Byte ranges of each placeholder occurrence, in pattern order.
    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    /// Inline regex text, if the placeholder declared one.
    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    fn shifted(&self, offset: usize) -> Self {
        Self {
            spans: self
                .spans
                .iter()
                .map(|s| s.start + offset..s.end + offset)
                .collect(),
            constraint: self.constraint.clone(),
        }
    }

    /// Fold `nested` into this rule. The nested constraint wins; every
    /// occurrence stays substitutable.
    fn absorb(&mut self, nested: Rule) {
        self.spans.extend(nested.spans);
        self.spans.sort_by_key(|s| s.start);
        self.spans.dedup();
        if nested.constraint.is_some() || self.constraint.is_none() {
            self.constraint = nested.constraint;
        }
    }
}

/// Compile the substitution rules of `pattern`.
///
/// Returns `None` when a placeholder is never closed or is empty.
pub fn compile_rules(pattern: &str) -> Option<Rules> {
    let bytes = pattern.as_bytes();
    let mut rules = Rules::new();

    if pattern.ends_with('*') {
        let end = pattern.len();
        rules.insert(WILDCARD.to_string(), Rule::new(end - 1..end, None));
    }

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }

        let start = i;
        let mut depth = 1;
        i += 1;
        while i < bytes.len() {
            match bytes[i] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        if depth > 0 {
            return None;
        }

        let body = &pattern[start + 1..i];
        if body.is_empty() {
            return None;
        }

        let (name, constraint) = match body.split_once(':') {
            Some((name, regex)) => (name, Some(regex.to_string())),
            None => (body, None),
        };
        let rule = Rule::new(start..i + 1, constraint);
        match rules.get_mut(name) {
            Some(existing) => existing.absorb(rule),
            None => {
                rules.insert(name.to_string(), rule);
            }
        }
        i += 1;
    }

    Some(rules)
}

/// Append `pattern` to `prefix`, dropping a trailing slash of `pattern`
/// unless `pattern` is the bare root `/`.
pub fn concat_prefix(prefix: &str, pattern: &str) -> String {
    let pattern = match pattern.strip_suffix('/') {
        Some(stripped) if pattern.len() > 1 => stripped,
        _ => pattern,
    };
    let mut joined = String::with_capacity(prefix.len() + pattern.len());
    joined.push_str(prefix);
    joined.push_str(pattern);
    joined
}

/// Split the inline `(name)/path` declaration form.
pub fn extract_name(pattern: &str) -> (Option<&str>, &str) {
    let Some(rest) = pattern.strip_prefix('(') else {
        return (None, pattern);
    };
    let Some(close) = rest.find(')') else {
        return (None, pattern);
    };
    let name = &rest[..close];
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphabetic() || b == b'_' || b == b'-');
    if !valid {
        return (None, pattern);
    }
    (Some(name), &rest[close + 1..])
}

/// A pattern together with the rules that substitute into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pattern: String,
    rules: Rules,
}

impl Template {
    /// Compile `pattern`, or `None` if it is structurally invalid.
    pub fn compile(pattern: &str) -> Option<Self> {
        compile_rules(pattern).map(|rules| Self {
            pattern: pattern.to_string(),
            rules,
        })
    }

    /// A template with no substitution rules.
    pub fn literal(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            rules: Rules::new(),
        }
    }

    /// Template of a mount point, without its trailing slash. The root
    /// contributes nothing, so routes mounted at `/` keep their own leading
    /// slash.
    pub fn mount_point(pattern: &str) -> Self {
        let pattern = concat_prefix("", pattern);
        if pattern == "/" {
            return Self::default();
        }
        Self::compile(&pattern).unwrap_or_else(|| Self::literal(&pattern))
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Number of distinct parameters a caller must supply.
    pub fn param_count(&self) -> usize {
        self.rules.len()
    }

    /// Concatenate `nested` below this template.
    ///
    /// The nested rules are shifted past this pattern and win on name
    /// collision. A trailing slash left by a nested `/` is dropped, the way
    /// axum serves the root of a nested router.
    pub fn join(&self, nested: &Template) -> Template {
        let offset = self.pattern.len();
        let mut rules = self.rules.clone();
        for (name, rule) in &nested.rules {
            let shifted = rule.shifted(offset);
            match rules.get_mut(name) {
                Some(existing) => existing.absorb(shifted),
                None => {
                    rules.insert(name.clone(), shifted);
                }
            }
        }
        let mut pattern = concat_prefix(&self.pattern, &nested.pattern);
        if pattern.len() > 1 && pattern.ends_with('/') {
            pattern.pop();
        }
        Template { pattern, rules }
    }

    /// Every placeholder occurrence as `(span, name)`, ordered by offset.
    pub fn placeholders(&self) -> Vec<(Range<usize>, &str)> {
        let mut all: Vec<_> = self
            .rules
            .iter()
            .flat_map(|(name, rule)| rule.spans.iter().map(move |s| (s.clone(), name.as_str())))
            .collect();
        all.sort_by_key(|(span, _)| span.start);
        all
    }

    /// Splice `values` into the pattern. Placeholders without a value are
    /// kept verbatim.
    pub fn render(&self, values: &HashMap<&str, String>) -> String {
        let mut out = String::with_capacity(self.pattern.len());
        let mut cursor = 0;
        for (span, name) in self.placeholders() {
            let Some(value) = values.get(name) else {
                continue;
            };
            if span.start < cursor {
                continue;
            }
            out.push_str(&self.pattern[cursor..span.start]);
            out.push_str(value);
            cursor = span.end;
        }
        out.push_str(&self.pattern[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(rules: &Rules, name: &str) -> Vec<Range<usize>> {
        rules[name].spans().to_vec()
    }

    #[test]
    fn test_plain_and_regex_params() {
        let pattern = "/foo/{bar:[a-z-]+}/{id}";
        let rules = compile_rules(pattern).unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(&pattern[spans(&rules, "bar")[0].clone()], "{bar:[a-z-]+}");
        assert_eq!(rules["bar"].constraint(), Some("[a-z-]+"));
        assert_eq!(&pattern[spans(&rules, "id")[0].clone()], "{id}");
        assert_eq!(rules["id"].constraint(), None);
    }

    #[test]
    fn test_wildcard() {
        let rules = compile_rules("/files/*").unwrap();
        assert_eq!(spans(&rules, WILDCARD), vec![7..8]);
    }

    #[test]
    fn test_nested_braces_in_regex() {
        let pattern = "/d/{date:[0-9]{4}-[0-9]{2}}/x";
        let rules = compile_rules(pattern).unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules["date"].constraint(), Some("[0-9]{4}-[0-9]{2}"));
        assert_eq!(&pattern[spans(&rules, "date")[0].clone()], "{date:[0-9]{4}-[0-9]{2}}");
    }

    #[test]
    fn test_unbalanced_is_none() {
        assert!(compile_rules("/foo/{bar").is_none());
        assert!(compile_rules("/foo/{bar:[0-9]{2}").is_none());
        assert!(compile_rules("/foo/{}").is_none());
        // A stray closing brace is plain text.
        assert!(compile_rules("/foo}").unwrap().is_empty());
    }

    #[test]
    fn test_root_mount_point() {
        let root = Template::mount_point("/");
        let route = Template::compile("/x/{id}").unwrap();

        assert_eq!(root.join(&route).pattern(), "/x/{id}");
        assert_eq!(Template::mount_point("/api/{v}").join(&route).pattern(), "/api/{v}/x/{id}");
    }

    #[test]
    fn test_mount_point_drops_trailing_slash() {
        let route = Template::compile("/x").unwrap();

        assert_eq!(Template::mount_point("/api/").pattern(), "/api");
        assert_eq!(Template::mount_point("/api/").join(&route).pattern(), "/api/x");
    }

    #[test]
    fn test_join_nested_root() {
        let root = Template::compile("/").unwrap();

        assert_eq!(Template::mount_point("/api").join(&root).pattern(), "/api");
        assert_eq!(Template::default().join(&root).pattern(), "/");
    }

    #[test]
    fn test_concat_prefix() {
        assert_eq!(concat_prefix("/api", "/"), "/api/");
        assert_eq!(concat_prefix("/api", "/x/"), "/api/x");
        assert_eq!(concat_prefix("/api", "/x"), "/api/x");
        assert_eq!(concat_prefix("", "/"), "/");
    }

    #[test]
    fn test_extract_name() {
        assert_eq!(extract_name("(user-show)/users/{id}"), (Some("user-show"), "/users/{id}"));
        assert_eq!(extract_name("/users/{id}"), (None, "/users/{id}"));
        assert_eq!(extract_name("(bad name)/x"), (None, "(bad name)/x"));
        assert_eq!(extract_name("()/x"), (None, "()/x"));
    }

    #[test]
    fn test_join_shifts_spans() {
        let outer = Template::compile("/nested/{foo}").unwrap();
        let inner = Template::compile("/bar/{baz}").unwrap();
        let joined = outer.join(&inner);

        assert_eq!(joined.pattern(), "/nested/{foo}/bar/{baz}");
        let baz = joined.rules()["baz"].spans()[0].clone();
        assert_eq!(&joined.pattern()[baz], "{baz}");
    }

    #[test]
    fn test_join_nested_constraint_wins() {
        let outer = Template::compile("/{id:[0-9]+}").unwrap();
        let inner = Template::compile("/sub/{id:[a-z]+}").unwrap();
        let joined = outer.join(&inner);

        let id = &joined.rules()["id"];
        assert_eq!(id.constraint(), Some("[a-z]+"));
        assert_eq!(id.spans().len(), 2);
        assert_eq!(joined.param_count(), 1);
    }

    #[test]
    fn test_render_all_occurrences() {
        let tpl = Template::compile("/{a}/x/{b:[0-9]+}/{a}").unwrap();
        let mut values = HashMap::new();
        values.insert("a", "1".to_string());
        values.insert("b", "22".to_string());

        assert_eq!(tpl.render(&values), "/1/x/22/1");
    }

    #[test]
    fn test_render_keeps_missing() {
        let tpl = Template::compile("/{a}/{b}").unwrap();
        let mut values = HashMap::new();
        values.insert("b", "2".to_string());

        assert_eq!(tpl.render(&values), "/{a}/2");
    }
}

//! Reverse path building.
//!
//! # Responsibilities
//! - Pair up heterogeneous parameter inputs into key/value pairs
//! - Substitute path parameters into the named route's pattern
//! - Collect every other key into a canonical query string
//!
//! # Design Decisions
//! - Values are not checked against inline regex constraints here; the
//!   router rejects non-matching requests at serve time
//! - Query keys are emitted in lexicographic order, values in supply order

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use url::form_urlencoded;

use crate::routing::error::BuildError;
use crate::routing::pattern::{Rules, WILDCARD};
use crate::routing::registry::RouteRegistry;

/// Query parameters: key → values in supply order.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// One argument to [`build_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// A bare string. Consecutive bare strings pair up as key, value.
    Str(String),
    /// A flat `[key, value, key, value, ...]` sequence.
    Pairs(Vec<String>),
    /// Query parameters merged wholesale into the query string.
    Query(QueryParams),
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Str(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::Str(s)
    }
}

impl From<&String> for Param {
    fn from(s: &String) -> Self {
        Param::Str(s.clone())
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Param {
    fn from((key, value): (K, V)) -> Self {
        Param::Pairs(vec![key.into(), value.into()])
    }
}

impl From<Vec<String>> for Param {
    fn from(flat: Vec<String>) -> Self {
        Param::Pairs(flat)
    }
}

impl From<&[&str]> for Param {
    fn from(flat: &[&str]) -> Self {
        Param::Pairs(flat.iter().map(|s| s.to_string()).collect())
    }
}

impl From<QueryParams> for Param {
    fn from(query: QueryParams) -> Self {
        Param::Query(query)
    }
}

impl From<HashMap<String, Vec<String>>> for Param {
    fn from(query: HashMap<String, Vec<String>>) -> Self {
        Param::Query(query.into_iter().collect())
    }
}

impl TryFrom<Value> for Param {
    type Error = BuildError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Param::Str(s)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(unsupported(&other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Param::Pairs),
            Value::Object(map) => {
                let mut query = QueryParams::new();
                for (key, values) in map {
                    let values = match values {
                        Value::String(s) => vec![s],
                        Value::Array(items) => items
                            .into_iter()
                            .map(|item| match item {
                                Value::String(s) => Ok(s),
                                other => Err(unsupported(&other)),
                            })
                            .collect::<Result<Vec<_>, _>>()?,
                        other => return Err(unsupported(&other)),
                    };
                    query.insert(key, values);
                }
                Ok(Param::Query(query))
            }
            other => Err(unsupported(&other)),
        }
    }
}

fn unsupported(value: &Value) -> BuildError {
    BuildError::UnsupportedParamType(match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    })
}

/// Build a `Vec<Param>` from heterogeneous arguments.
///
/// ```
/// use reverse_router::params;
///
/// let p = params!["id", "42", ("page", "2")];
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::routing::builder::Param>::new()
    };
    ($($param:expr),+ $(,)?) => {
        ::std::vec![$($crate::routing::builder::Param::from($param)),+]
    };
}

/// Values collected while walking the parameter list.
struct Collected<'r> {
    rules: &'r Rules,
    values: HashMap<&'r str, String>,
    query: QueryParams,
    remaining: usize,
}

impl<'r> Collected<'r> {
    fn new(rules: &'r Rules) -> Self {
        Self {
            rules,
            values: HashMap::with_capacity(rules.len()),
            query: QueryParams::new(),
            remaining: rules.len(),
        }
    }

    /// Route `key` to its path parameter, or to the query string. A path
    /// parameter keeps the first value it was given.
    fn assign(&mut self, key: String, value: String) {
        let rules = self.rules;
        match rules.get_key_value(key.as_str()) {
            Some((param, _)) => {
                if !self.values.contains_key(param.as_str()) {
                    self.values
                        .insert(param.as_str(), escape_path_value(param, &value));
                    self.remaining -= 1;
                }
            }
            None => self.query.entry(key).or_default().push(value),
        }
    }

    fn merge_query(&mut self, extra: QueryParams) {
        for (key, values) in extra {
            self.query.entry(key).or_default().extend(values);
        }
    }
}

/// Build the path (and query string) of the route registered as `name`.
pub fn build_path<I>(registry: &RouteRegistry, name: &str, params: I) -> Result<String, BuildError>
where
    I: IntoIterator,
    I::Item: Into<Param>,
{
    let route = registry
        .get(name)
        .ok_or_else(|| BuildError::RouteNotFound(name.to_string()))?;
    let mut collected = Collected::new(route.template().rules());

    let mut pending: Option<String> = None;
    for param in params {
        match param.into() {
            Param::Str(s) => match pending.take() {
                Some(key) => collected.assign(key, s),
                None => pending = Some(s),
            },
            Param::Pairs(flat) => {
                if let Some(key) = pending.take() {
                    return Err(BuildError::DanglingKey(key));
                }
                if flat.len() % 2 != 0 {
                    return Err(BuildError::OddPairs(flat.len()));
                }
                let mut it = flat.into_iter();
                while let (Some(key), Some(value)) = (it.next(), it.next()) {
                    collected.assign(key, value);
                }
            }
            Param::Query(extra) => {
                if let Some(key) = pending.take() {
                    return Err(BuildError::DanglingKey(key));
                }
                collected.merge_query(extra);
            }
        }
    }
    if let Some(key) = pending {
        return Err(BuildError::DanglingKey(key));
    }

    if collected.remaining > 0 {
        let missing = collected
            .rules
            .keys()
            .filter(|k| !collected.values.contains_key(k.as_str()))
            .cloned()
            .collect();
        return Err(BuildError::MissingParams {
            route: name.to_string(),
            missing,
        });
    }

    let mut path = route.template().render(&collected.values);
    if !collected.query.is_empty() {
        path.push('?');
        path.push_str(&encode_query(&collected.query));
    }
    Ok(path)
}

/// Percent-escape a path value. The wildcard keeps its `/` separators.
fn escape_path_value(param: &str, value: &str) -> String {
    if param == WILDCARD {
        value
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    } else {
        urlencoding::encode(value).into_owned()
    }
}

fn encode_query(query: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, values) in query {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

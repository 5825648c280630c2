//! Route parameter sets extracted from matched URLs
//!
//! A parameter is either a single segment (`:id`) or the list of segments
//! captured by a repeatable parameter (`:path+`, `:catchAll(.*)*`).

use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Value of one route parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Value captured from one segment
    Single(String),
    /// Values captured by a repeatable segment, in path order
    Repeated(Vec<String>),
}

impl ParamValue {
    /// Returns the value if this is a single segment
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            ParamValue::Repeated(_) => None,
        }
    }

    /// Returns every captured segment (one for single values)
    pub fn segments(&self) -> Vec<&str> {
        match self {
            ParamValue::Single(value) => vec![value.as_str()],
            ParamValue::Repeated(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, ParamValue::Repeated(_))
    }
}

impl fmt::Display for ParamValue {
    /// Repeated values are shown the way they appear in the path, joined by `/`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Single(value) => f.write_str(value),
            ParamValue::Repeated(values) => f.write_str(&values.join("/")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Repeated(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::Repeated(values.into_iter().map(str::to_string).collect())
    }
}

/// Raw (string) parameters of one navigation, keyed by parameter name
///
/// # Examples
///
/// ```
/// use dashroute::{ParamValue, RawParams};
///
/// let params: RawParams = [("selfId", "123")].into_iter().collect();
/// assert_eq!(params.get_str("selfId"), Some("123"));
/// assert_eq!(params.get("selfId"), Some(&ParamValue::Single("123".to_string())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawParams(HashMap<String, ParamValue>);

impl RawParams {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Returns the parameter only if it holds a single segment
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(ParamValue::as_single)
    }

    /// Inserts a parameter, returning the previous value for that name
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    pub fn into_inner(self) -> HashMap<String, ParamValue> {
        self.0
    }
}

impl<K, V> FromIterator<(K, V)> for RawParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, ParamValue>> for RawParams {
    fn from(map: HashMap<String, ParamValue>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a RawParams {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = hash_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//! Parameter transformer: turns raw route parameters into typed values
//!
//! A [`FieldConstructors`] map registers, per parameter name, a conversion
//! function with a known output type `T`. Applying it to a [`RawParams`]
//! produces a [`TransformedParams`] with exactly the same keys:
//! - keys with a registered constructor hold [`Field::Converted`]
//! - every other key is passed through unchanged as [`Field::Raw`]
//!
//! Constructor failures are not recovered; the first one aborts the
//! transformation and is returned as a [`TransformError`].
//!
//! # Examples
//!
//! ```
//! use dashroute::transform::{parse, transform, FieldConstructors};
//! use dashroute::RawParams;
//!
//! let to_typed = transform(FieldConstructors::<u64>::new().field("selfId", parse::<u64>()));
//!
//! let raw: RawParams = [("selfId", "123"), ("tab", "stats")].into_iter().collect();
//! let typed = to_typed(&raw).unwrap();
//!
//! assert_eq!(typed.get_converted("selfId"), Some(&123));
//! assert_eq!(typed.get_raw("tab").and_then(|v| v.as_single()), Some("stats"));
//! ```

use std::collections::{hash_map, HashMap};
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::error::{BoxError, ConstructError, TransformError};
use crate::params::{ParamValue, RawParams};

/// Type-erased field constructor producing a `T`
pub type Constructor<T> = dyn Fn(&ParamValue) -> Result<T, ConstructError> + Send + Sync;

/// Mapping from parameter name to the constructor that converts it
pub struct FieldConstructors<T> {
    fields: HashMap<String, Arc<Constructor<T>>>,
}

impl<T: 'static> FieldConstructors<T> {
    /// Creates an empty map (every parameter passes through)
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Registers the constructor for one parameter (builder style)
    ///
    /// The constructor may return any value convertible into `T` and any
    /// error convertible into a boxed error; plain strings work as errors.
    /// Registering the same name twice keeps the last constructor.
    pub fn field<F, U, E>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&ParamValue) -> Result<U, E> + Send + Sync + 'static,
        U: Into<T> + 'static,
        E: Into<BoxError> + 'static,
    {
        let erased = move |value: &ParamValue| -> Result<T, ConstructError> {
            constructor(value)
                .map(Into::into)
                .map_err(|error| ConstructError::from_boxed(error.into()))
        };
        self.fields.insert(name.into(), Arc::new(erased));
        self
    }
}

impl<T> FieldConstructors<T> {
    pub fn get(&self, name: &str) -> Option<&Constructor<T>> {
        self.fields.get(name).map(|constructor| constructor.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T: 'static> Default for FieldConstructors<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FieldConstructors<T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<T> fmt::Debug for FieldConstructors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("FieldConstructors")
            .field("fields", &names)
            .finish()
    }
}

/// One entry of a transformed parameter set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field<T> {
    /// No constructor registered: the raw value, untouched
    Raw(ParamValue),
    /// Output of the registered constructor
    Converted(T),
}

impl<T> Field<T> {
    pub fn raw(&self) -> Option<&ParamValue> {
        match self {
            Field::Raw(value) => Some(value),
            Field::Converted(_) => None,
        }
    }

    pub fn converted(&self) -> Option<&T> {
        match self {
            Field::Converted(value) => Some(value),
            Field::Raw(_) => None,
        }
    }

    pub fn into_converted(self) -> Option<T> {
        match self {
            Field::Converted(value) => Some(value),
            Field::Raw(_) => None,
        }
    }
}

/// Output of a transformation: same keys as the input parameter set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransformedParams<T>(HashMap<String, Field<T>>);

impl<T> TransformedParams<T> {
    pub fn get(&self, name: &str) -> Option<&Field<T>> {
        self.0.get(name)
    }

    /// Returns the constructed value for `name`, if a constructor ran for it
    pub fn get_converted(&self, name: &str) -> Option<&T> {
        self.0.get(name).and_then(Field::converted)
    }

    /// Returns the passed-through value for `name`, if no constructor was registered
    pub fn get_raw(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name).and_then(Field::raw)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Field<T>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> HashMap<String, Field<T>> {
        self.0
    }
}

/// Reusable transformer sharing one immutable constructor map
pub struct ParamTransformer<T> {
    constructors: Arc<FieldConstructors<T>>,
}

impl<T> ParamTransformer<T> {
    pub fn new(constructors: FieldConstructors<T>) -> Self {
        Self {
            constructors: Arc::new(constructors),
        }
    }

    pub fn constructors(&self) -> &FieldConstructors<T> {
        &self.constructors
    }

    /// Converts every registered field and passes the rest through
    pub fn apply(&self, raw: &RawParams) -> Result<TransformedParams<T>, TransformError> {
        raw.iter()
            .map(|(name, value)| {
                let field = match self.constructors.get(name) {
                    Some(constructor) => {
                        trace!(field = %name, "converting route parameter");
                        let converted = constructor(value).map_err(|source| TransformError {
                            field: name.clone(),
                            source,
                        })?;
                        Field::Converted(converted)
                    }
                    None => Field::Raw(value.clone()),
                };
                Ok((name.clone(), field))
            })
            .collect::<Result<HashMap<_, _>, TransformError>>()
            .map(TransformedParams)
    }
}

impl<T: 'static> ParamTransformer<T> {
    /// Transformer with no constructors: output mirrors the input
    pub fn passthrough() -> Self {
        Self::new(FieldConstructors::new())
    }
}

impl<T> Clone for ParamTransformer<T> {
    fn clone(&self) -> Self {
        Self {
            constructors: Arc::clone(&self.constructors),
        }
    }
}

impl<T> fmt::Debug for ParamTransformer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParamTransformer")
            .field(&self.constructors)
            .finish()
    }
}

/// Builds a transformation function from a constructor map
///
/// `transform(constructors)(raw)` is equivalent to
/// `ParamTransformer::new(constructors).apply(raw)`.
pub fn transform<T>(
    constructors: FieldConstructors<T>,
) -> impl Fn(&RawParams) -> Result<TransformedParams<T>, TransformError> {
    let transformer = ParamTransformer::new(constructors);
    move |raw: &RawParams| transformer.apply(raw)
}

// ============================================================================
// Ready-made constructors
// ============================================================================

/// Parses a single-segment parameter with [`FromStr`]
///
/// Repeated parameters are rejected.
pub fn parse<U>() -> impl Fn(&ParamValue) -> Result<U, ConstructError> + Send + Sync + Clone
where
    U: FromStr,
    U::Err: StdError + Send + Sync + 'static,
{
    |value: &ParamValue| {
        let raw = value.as_single().ok_or_else(|| {
            ConstructError::new(format!(
                "expected a single path segment, found `{value}`"
            ))
        })?;
        raw.parse::<U>()
            .map_err(|error| ConstructError::with_source(format!("cannot parse `{raw}`: {error}"), error))
    }
}

/// Parses every captured segment with [`FromStr`]
///
/// A single-segment parameter yields a one-element list.
pub fn parse_each<U>(
) -> impl Fn(&ParamValue) -> Result<Vec<U>, ConstructError> + Send + Sync + Clone
where
    U: FromStr,
    U::Err: StdError + Send + Sync + 'static,
{
    |value: &ParamValue| {
        value
            .segments()
            .into_iter()
            .map(|segment| {
                segment.parse::<U>().map_err(|error| {
                    ConstructError::with_source(format!("cannot parse `{segment}`: {error}"), error)
                })
            })
            .collect()
    }
}

/// Joins the captured segments back into a path fragment
pub fn joined() -> impl Fn(&ParamValue) -> Result<String, ConstructError> + Send + Sync + Clone {
    |value: &ParamValue| Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_empty_constructors_pass_through() {
        let to_typed = transform(FieldConstructors::<u64>::new());
        let typed = to_typed(&raw(&[("selfId", "123")])).unwrap();

        assert_eq!(typed.len(), 1);
        assert_eq!(typed.get("selfId"), Some(&Field::Raw(ParamValue::from("123"))));
    }

    #[test]
    fn test_registered_field_is_converted() {
        let to_typed = transform(FieldConstructors::<u64>::new().field("selfId", parse::<u64>()));
        let typed = to_typed(&raw(&[("selfId", "123")])).unwrap();

        assert_eq!(typed.get("selfId"), Some(&Field::Converted(123)));
    }

    #[test]
    fn test_constructor_for_missing_key_adds_nothing() {
        let to_typed = transform(FieldConstructors::<u64>::new().field("selfId", parse::<u64>()));
        let typed = to_typed(&RawParams::new()).unwrap();

        assert!(typed.is_empty());
    }

    #[test]
    fn test_constructor_failure_propagates() {
        let to_typed = transform(FieldConstructors::<u64>::new().field("selfId", parse::<u64>()));
        let error = to_typed(&raw(&[("selfId", "abc")])).unwrap_err();

        assert_eq!(error.field, "selfId");
        assert!(error.source.message().contains("cannot parse `abc`"));
    }

    #[test]
    fn test_parse_rejects_repeated_values() {
        let mut params = RawParams::new();
        params.insert("id", vec!["1", "2"]);

        let error = ParamTransformer::new(FieldConstructors::<u64>::new().field("id", parse::<u64>()))
            .apply(&params)
            .unwrap_err();
        assert!(error.source.message().contains("expected a single path segment"));
    }

    #[test]
    fn test_parse_each_converts_all_segments() {
        let mut params = RawParams::new();
        params.insert("ids", vec!["1", "2", "3"]);

        let typed = ParamTransformer::new(
            FieldConstructors::<Vec<u32>>::new().field("ids", parse_each::<u32>()),
        )
        .apply(&params)
        .unwrap();
        assert_eq!(typed.get_converted("ids"), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_joined_rebuilds_path() {
        let mut params = RawParams::new();
        params.insert("catchAll", vec!["a", "b"]);

        let typed = ParamTransformer::new(FieldConstructors::<String>::new().field("catchAll", joined()))
            .apply(&params)
            .unwrap();
        assert_eq!(typed.get_converted("catchAll").map(String::as_str), Some("a/b"));
    }

    #[test]
    fn test_closure_constructor_with_string_error() {
        let constructors = FieldConstructors::<String>::new().field("name", |value: &ParamValue| {
            match value.as_single() {
                Some(name) if !name.is_empty() => Ok(name.to_uppercase()),
                _ => Err("name must not be empty"),
            }
        });

        let typed = transform(constructors.clone())(&raw(&[("name", "bot")])).unwrap();
        assert_eq!(typed.get_converted("name").map(String::as_str), Some("BOT"));

        let error = transform(constructors)(&raw(&[("name", "")])).unwrap_err();
        assert_eq!(error.source.message(), "name must not be empty");
    }

    #[test]
    fn test_constructor_output_converted_into_target_type() {
        #[derive(Debug, PartialEq)]
        enum Value {
            Id(u64),
        }

        impl From<u64> for Value {
            fn from(id: u64) -> Self {
                Value::Id(id)
            }
        }

        let typed = transform(FieldConstructors::<Value>::new().field("selfId", parse::<u64>()))(
            &raw(&[("selfId", "9")]),
        )
        .unwrap();
        assert_eq!(typed.get_converted("selfId"), Some(&Value::Id(9)));
    }

    #[test]
    fn test_transformers_share_constructor_map() {
        let transformer =
            ParamTransformer::new(FieldConstructors::<u64>::new().field("selfId", parse::<u64>()));
        let copy = transformer.clone();

        assert!(Arc::ptr_eq(&transformer.constructors, &copy.constructors));
        assert_eq!(format!("{copy:?}"), "ParamTransformer(FieldConstructors { fields: [\"selfId\"] })");
    }
}

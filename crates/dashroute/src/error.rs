//! Error types for route registration, resolution and parameter conversion
//!
//! Each stage fails with its own type:
//! - [`PatternError`] when a route pattern cannot be parsed at registration
//! - [`RouteError`] when resolution or URL generation cannot proceed
//! - [`ConstructError`] / [`TransformError`] when a field constructor rejects a raw value
//! - [`ViewLoadError`] when a lazy view loader fails
//! - [`UnknownKindError`] when a configured parameter kind is not recognized

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error accepted from user-supplied constructors
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A field constructor could not convert a raw parameter value
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConstructError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl ConstructError {
    /// Creates an error carrying only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error that keeps the underlying cause as its source
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Converts any boxed error into a `ConstructError`
    ///
    /// A boxed `ConstructError` is unwrapped rather than nested.
    pub fn from_boxed(error: BoxError) -> Self {
        match error.downcast::<ConstructError>() {
            Ok(construct) => *construct,
            Err(other) => Self {
                message: other.to_string(),
                source: Some(other),
            },
        }
    }

    /// Human-readable reason for the failure
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A registered constructor failed while transforming a parameter set
#[derive(Debug, Error)]
#[error("failed to convert route parameter `{field}`: {source}")]
pub struct TransformError {
    /// Name of the parameter whose constructor failed
    pub field: String,
    /// The constructor's error
    #[source]
    pub source: ConstructError,
}

/// Invalid route pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("empty parameter name in segment `{segment}`")]
    EmptyParamName { segment: String },

    #[error("unbalanced parenthesis in segment `{segment}`")]
    UnbalancedRegex { segment: String },

    #[error("invalid regex `{regex}` for parameter `{param}`: {reason}")]
    InvalidRegex {
        param: String,
        regex: String,
        reason: String,
    },

    #[error("parameter `{name}` appears more than once in `{pattern}`")]
    DuplicateParam { name: String, pattern: String },

    #[error("unexpected `{found}` after parameter `{param}`")]
    TrailingCharacters { param: String, found: String },
}

/// Failure to resolve a location or build a URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route matches `{path}`")]
    NoMatch { path: String },

    #[error("no route named `{name}`")]
    UnknownRoute { name: String },

    #[error("route `{route}` requires parameter `{param}`")]
    MissingParam { route: String, param: String },

    #[error("invalid value for parameter `{param}` of route `{route}`: {reason}")]
    InvalidParam {
        route: String,
        param: String,
        reason: String,
    },
}

/// A parameter kind name that is not one of the built-in kinds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parameter kind `{0}` (expected one of: int, uint, float, bool, string, uuid, list)")]
pub struct UnknownKindError(pub String);

/// A lazy view loader failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load view `{view}`: {reason}")]
pub struct ViewLoadError {
    pub view: String,
    pub reason: String,
}

impl ViewLoadError {
    pub fn new(view: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            reason: reason.into(),
        }
    }
}

//! Built-in parameter kinds for routes declared in configuration
//!
//! Code can register any closure as a field constructor. A route table
//! loaded from TOML can only name one of the kinds below, e.g.
//! `params = { selfId = "uint" }`; each kind converts to a [`TypedValue`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConstructError, UnknownKindError};
use crate::params::ParamValue;
use crate::transform::{parse, FieldConstructors};

/// Target type of a configured parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Signed 64-bit integer
    Int,
    /// Unsigned 64-bit integer
    UInt,
    Float,
    /// `true` or `false`, nothing else
    Bool,
    /// The raw text; repeated values are joined with `/`
    String,
    Uuid,
    /// Every captured segment as a list of strings
    List,
}

impl ParamKind {
    pub const ALL: [ParamKind; 7] = [
        ParamKind::Int,
        ParamKind::UInt,
        ParamKind::Float,
        ParamKind::Bool,
        ParamKind::String,
        ParamKind::Uuid,
        ParamKind::List,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Int => "int",
            ParamKind::UInt => "uint",
            ParamKind::Float => "float",
            ParamKind::Bool => "bool",
            ParamKind::String => "string",
            ParamKind::Uuid => "uuid",
            ParamKind::List => "list",
        }
    }

    /// Converts a raw parameter value into this kind
    ///
    /// # Examples
    ///
    /// ```
    /// use dashroute::{ParamKind, ParamValue, TypedValue};
    ///
    /// let value = ParamKind::UInt.convert(&ParamValue::from("123")).unwrap();
    /// assert_eq!(value, TypedValue::UInt(123));
    ///
    /// assert!(ParamKind::UInt.convert(&ParamValue::from("-1")).is_err());
    /// ```
    pub fn convert(&self, value: &ParamValue) -> Result<TypedValue, ConstructError> {
        match self {
            ParamKind::Int => parse::<i64>()(value).map(TypedValue::Int),
            ParamKind::UInt => parse::<u64>()(value).map(TypedValue::UInt),
            ParamKind::Float => parse::<f64>()(value).map(TypedValue::Float),
            ParamKind::Bool => parse::<bool>()(value).map(TypedValue::Bool),
            ParamKind::Uuid => parse::<Uuid>()(value).map(TypedValue::Uuid),
            ParamKind::String => Ok(TypedValue::Str(value.to_string())),
            ParamKind::List => Ok(TypedValue::List(
                value.segments().into_iter().map(str::to_string).collect(),
            )),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKindError(s.to_string()))
    }
}

/// A converted parameter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Str(String),
    Uuid(Uuid),
    List(Vec<String>),
}

impl TypedValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            TypedValue::Int(_) => ParamKind::Int,
            TypedValue::UInt(_) => ParamKind::UInt,
            TypedValue::Float(_) => ParamKind::Float,
            TypedValue::Bool(_) => ParamKind::Bool,
            TypedValue::Str(_) => ParamKind::String,
            TypedValue::Uuid(_) => ParamKind::Uuid,
            TypedValue::List(_) => ParamKind::List,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Int(v) => write!(f, "{v}"),
            TypedValue::UInt(v) => write!(f, "{v}"),
            TypedValue::Float(v) => write!(f, "{v}"),
            TypedValue::Bool(v) => write!(f, "{v}"),
            TypedValue::Str(v) => f.write_str(v),
            TypedValue::Uuid(v) => write!(f, "{v}"),
            TypedValue::List(v) => write!(f, "[{}]", v.join(", ")),
        }
    }
}

/// Builds a constructor map from a `name → kind` table
pub fn field_constructors(kinds: &HashMap<String, ParamKind>) -> FieldConstructors<TypedValue> {
    kinds
        .iter()
        .fold(FieldConstructors::new(), |constructors, (name, &kind)| {
            constructors.field(name.clone(), move |value: &ParamValue| kind.convert(value))
        })
}

//! Declarative route records
//!
//! A [`RouteRecord`] is what the application writes down: a path, a view,
//! and optionally a name, props forwarding, metadata, aliases and children.
//! The [`Router`](crate::Router) compiles records into matchable routes.
//!
//! ```
//! use dashroute::transform::{parse, FieldConstructors};
//! use dashroute::RouteRecord;
//!
//! let table: Vec<RouteRecord<&str, u64>> = vec![
//!     RouteRecord::new("/", "layouts/MainLayout").with_children([
//!         RouteRecord::new("", "pages/LoginView").with_name("login"),
//!         RouteRecord::new("/index", "pages/IndexView"),
//!         RouteRecord::new("/bot-detail/:selfId", "pages/BotDetailView")
//!             .with_name("BotDetail")
//!             .with_props_transform(FieldConstructors::new().field("selfId", parse::<u64>())),
//!     ]),
//!     RouteRecord::new("/:catchAll(.*)*", "pages/NotFoundView"),
//! ];
//! assert_eq!(table[0].children.len(), 3);
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::transform::{FieldConstructors, ParamTransformer};
use crate::view::{LazyView, ViewSource};

/// How matched parameters reach the view
pub enum Props<T> {
    /// Parameters are not forwarded
    Off,
    /// Raw parameters are forwarded as-is
    Params,
    /// Parameters are forwarded after running the transformer
    Transform(ParamTransformer<T>),
}

impl<T: 'static> Props<T> {
    /// The transformer to run on a match, `None` when props are off
    ///
    /// Forwarding raw parameters is a transform with no constructors.
    pub fn transformer(&self) -> Option<ParamTransformer<T>> {
        match self {
            Props::Off => None,
            Props::Params => Some(ParamTransformer::passthrough()),
            Props::Transform(transformer) => Some(transformer.clone()),
        }
    }
}

impl<T> Props<T> {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Props::Off)
    }
}

impl<T> Default for Props<T> {
    fn default() -> Self {
        Props::Off
    }
}

impl<T> Clone for Props<T> {
    fn clone(&self) -> Self {
        match self {
            Props::Off => Props::Off,
            Props::Params => Props::Params,
            Props::Transform(transformer) => Props::Transform(transformer.clone()),
        }
    }
}

impl<T> fmt::Debug for Props<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Props::Off => f.write_str("Off"),
            Props::Params => f.write_str("Params"),
            Props::Transform(transformer) => f.debug_tuple("Transform").field(transformer).finish(),
        }
    }
}

/// One entry of the route table
///
/// `V` is the view type, `T` the output type of the props transformer.
#[derive(Debug)]
pub struct RouteRecord<V, T> {
    /// Path pattern, relative to the parent unless it starts with `/`
    pub path: String,
    pub name: Option<String>,
    pub view: ViewSource<V>,
    pub props: Props<T>,
    /// Nested records; a record with children acts as their layout
    pub children: Vec<RouteRecord<V, T>>,
    /// Arbitrary metadata (titles, permissions, ...), inherited by children
    pub metadata: HashMap<String, String>,
    /// Additional patterns matching this record, joined like `path`
    pub aliases: Vec<String>,
}

impl<V, T> RouteRecord<V, T> {
    /// Creates a record whose view is available immediately
    pub fn new(path: impl Into<String>, view: V) -> Self {
        Self::with_view_source(path, ViewSource::Eager(view))
    }

    /// Creates a record whose view is loaded on first navigation
    pub fn lazy(path: impl Into<String>, view: LazyView<V>) -> Self {
        Self::with_view_source(path, ViewSource::Lazy(view))
    }

    fn with_view_source(path: impl Into<String>, view: ViewSource<V>) -> Self {
        Self {
            path: path.into(),
            name: None,
            view,
            props: Props::Off,
            children: Vec::new(),
            metadata: HashMap::new(),
            aliases: Vec::new(),
        }
    }

    /// Sets a name for URL generation
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Forwards raw route parameters to the view
    pub fn with_props(mut self) -> Self {
        self.props = Props::Params;
        self
    }

    /// Forwards route parameters after converting the registered fields
    pub fn with_props_transform(mut self, constructors: FieldConstructors<T>) -> Self {
        self.props = Props::Transform(ParamTransformer::new(constructors));
        self
    }

    pub fn with_props_mode(mut self, props: Props<T>) -> Self {
        self.props = props;
        self
    }

    pub fn with_child(mut self, child: RouteRecord<V, T>) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = RouteRecord<V, T>>,
    {
        self.children.extend(children);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Whether this record wraps other records
    pub fn is_layout(&self) -> bool {
        !self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RawParams;
    use crate::transform::parse;

    #[test]
    fn test_builder_defaults() {
        let record: RouteRecord<&str, u64> = RouteRecord::new("/index", "pages/IndexView");
        assert_eq!(record.path, "/index");
        assert!(record.name.is_none());
        assert!(!record.props.is_enabled());
        assert!(!record.is_layout());
    }

    #[test]
    fn test_props_params_is_passthrough() {
        let record: RouteRecord<&str, u64> =
            RouteRecord::new("/bot-detail/:selfId", "pages/BotDetailView").with_props();
        let transformer = record.props.transformer().unwrap();
        assert!(transformer.constructors().is_empty());

        let raw: RawParams = [("selfId", "123")].into_iter().collect();
        let typed = transformer.apply(&raw).unwrap();
        assert_eq!(typed.get_raw("selfId").and_then(|v| v.as_single()), Some("123"));
    }

    #[test]
    fn test_props_transform() {
        let record: RouteRecord<&str, u64> = RouteRecord::new("/bot-detail/:selfId", "view")
            .with_props_transform(FieldConstructors::new().field("selfId", parse::<u64>()));
        let transformer = record.props.transformer().unwrap();
        assert!(transformer.constructors().contains("selfId"));
    }

    #[test]
    fn test_layout_with_children() {
        let record: RouteRecord<&str, u64> = RouteRecord::new("/", "layouts/MainLayout")
            .with_child(RouteRecord::new("", "pages/LoginView"))
            .with_meta("title", "Dashboard");
        assert!(record.is_layout());
        assert_eq!(record.metadata.get("title").map(String::as_str), Some("Dashboard"));
    }
}

//! # dashroute
//!
//! Declarative route table for the bot dashboard single-page app:
//! - Static routes (`/index`)
//! - Dynamic parameters (`/bot-detail/:selfId`)
//! - Optional, repeatable and regex-constrained parameters (`/:id?`, `/:path+`, `/:catchAll(.*)*`)
//! - Nested records sharing a layout view
//! - Lazily loaded views
//! - Typed route props through a parameter transformer
//!
//! ## Resolution
//!
//! A URL is split into path, query and hash, the base path is stripped and
//! the path normalized (trailing slashes, double slashes, backslashes).
//! Routes are tried in priority order: static before dynamic before
//! repeatable before catch-all, ties broken by registration order.
//!
//! ## Example
//!
//! ```
//! use dashroute::transform::{parse, FieldConstructors};
//! use dashroute::{LazyView, RouteRecord, Router};
//!
//! let router: Router<&str, u64> = Router::new()
//!     .with_records([
//!         RouteRecord::new("/", "MainLayout").with_children([
//!             RouteRecord::new("", "LoginView").with_name("login"),
//!             RouteRecord::new("/index", "IndexView"),
//!             RouteRecord::lazy("/bot-detail/:selfId", LazyView::new("BotDetail", || Ok("BotDetail")))
//!                 .with_name("BotDetail")
//!                 .with_props_transform(FieldConstructors::new().field("selfId", parse::<u64>())),
//!         ]),
//!         RouteRecord::new("/:catchAll(.*)*", "NotFoundView"),
//!     ])
//!     .unwrap();
//!
//! let resolution = router.resolve("/bot-detail/123").unwrap();
//! assert_eq!(resolution.view().unwrap(), &"BotDetail");
//! assert_eq!(resolution.layouts().unwrap(), vec![&"MainLayout"]);
//!
//! let props = resolution.props().unwrap().unwrap();
//! assert_eq!(props.get_converted("selfId"), Some(&123));
//!
//! let missing = router.resolve("/nonexistent").unwrap();
//! assert!(missing.is_fallback());
//! assert_eq!(missing.view().unwrap(), &"NotFoundView");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod error;
pub mod kind;
pub mod params;
pub mod path;
pub mod record;
pub mod route;
pub mod transform;
pub mod view;

pub use config::Config;
pub use error::{ConstructError, PatternError, RouteError, TransformError, ViewLoadError};
pub use kind::{ParamKind, TypedValue};
pub use params::{ParamValue, RawParams};
pub use path::{is_valid_path, normalize_path, Location};
pub use record::{Props, RouteRecord};
pub use route::{ParsedPattern, PatternSegmentType};
pub use transform::{transform, Field, FieldConstructors, ParamTransformer, TransformedParams};
pub use view::{LazyView, ViewSource};

use route::{calculate_priority, join_paths, match_segments, parse_pattern};

// ============================================================================
// Core Types
// ============================================================================

/// A matchable route compiled from a leaf [`RouteRecord`]
pub struct Route<V, T> {
    /// Full canonical pattern like "/bot-detail/:selfId"
    pub pattern: String,
    /// Typed segments of the pattern
    pub segments: Vec<PatternSegmentType>,
    /// Parameter names in path order
    pub params: Vec<String>,
    /// Parameters that may be absent
    pub optional_params: Vec<String>,
    /// Priority for matching (lower = higher priority)
    pub priority: usize,
    /// Optional name for URL generation
    pub name: Option<String>,
    /// Metadata merged from enclosing layouts, innermost wins
    pub metadata: HashMap<String, String>,
    /// Alternative patterns mapping to this route
    pub aliases: Vec<ParsedPattern>,
    view: Arc<ViewSource<V>>,
    layouts: Vec<Arc<ViewSource<V>>>,
    props: Props<T>,
    order: usize,
}

impl<V, T> Route<V, T> {
    /// Matches this route against a path (case-sensitive)
    pub fn matches(&self, path: &str) -> Option<RawParams> {
        self.matches_with_options(path, false)
    }

    /// Matches this route against a path, trying the primary pattern then each alias
    pub fn matches_with_options(&self, path: &str, case_insensitive: bool) -> Option<RawParams> {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
        self.match_path_segments(&segments, case_insensitive)
    }

    fn match_path_segments(&self, segments: &[&str], case_insensitive: bool) -> Option<RawParams> {
        match_segments(&self.segments, segments, case_insensitive).or_else(|| {
            self.aliases.iter().find_map(|alias| {
                let params = match_segments(&alias.segments, segments, case_insensitive)?;
                trace!(route = %self.pattern, alias = %alias.pattern, "matched through alias");
                Some(params)
            })
        })
    }

    /// Whether this route matches any path (every segment may be absent and
    /// at least one swallows the rest), like `/:catchAll(.*)*`
    pub fn is_catch_all(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, PatternSegmentType::ZeroOrMore(..)))
            && self.segments.iter().all(PatternSegmentType::is_optional)
    }

    /// Matching order: catch-all routes last, then priority, then registration order
    fn sort_key(&self) -> (bool, usize, usize) {
        (self.is_catch_all(), self.priority, self.order)
    }

    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn view_source(&self) -> &ViewSource<V> {
        &self.view
    }

    /// Layout views wrapping this route, outermost first
    pub fn layout_sources(&self) -> impl Iterator<Item = &ViewSource<V>> {
        self.layouts.iter().map(|layout| layout.as_ref())
    }

    pub fn props(&self) -> &Props<T> {
        &self.props
    }

    /// Generates a URL for this route by substituting parameters
    ///
    /// Values are percent-encoded; repeated values become consecutive
    /// segments. Absent optional parameters are skipped.
    ///
    /// # Errors
    ///
    /// - [`RouteError::MissingParam`] when a required parameter has no value
    /// - [`RouteError::InvalidParam`] when a value would not match its own
    ///   segment: several values for a non-repeatable parameter, or a value
    ///   rejected by the segment's regex
    ///
    /// # Examples
    ///
    /// ```
    /// use dashroute::{RawParams, RouteRecord, Router};
    ///
    /// let router: Router<&str, ()> = Router::new()
    ///     .with_record(RouteRecord::new("/bot-detail/:selfId", "BotDetail").with_name("BotDetail"))
    ///     .unwrap();
    ///
    /// let params: RawParams = [("selfId", "bot 1")].into_iter().collect();
    /// let route = router.route_by_name("BotDetail").unwrap();
    /// assert_eq!(route.generate_url(&params).unwrap(), "/bot-detail/bot%201");
    /// ```
    pub fn generate_url(&self, params: &RawParams) -> Result<String, RouteError> {
        let route_label = || self.name.clone().unwrap_or_else(|| self.pattern.clone());
        let invalid = |param: &str, reason: String| RouteError::InvalidParam {
            route: route_label(),
            param: param.to_string(),
            reason,
        };

        let mut parts: Vec<String> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let (name, value) = match segment {
                PatternSegmentType::Static(text) => {
                    parts.push(text.clone());
                    continue;
                }
                other => match other.param_name() {
                    Some(name) => (name, params.get(name)),
                    None => continue,
                },
            };

            let values: Vec<&str> = value
                .map(|v| v.segments().into_iter().filter(|s| !s.is_empty()).collect())
                .unwrap_or_default();

            if values.is_empty() && !segment.is_optional() {
                return Err(RouteError::MissingParam {
                    route: route_label(),
                    param: name.to_string(),
                });
            }
            if values.len() > 1 && !segment.is_repeatable() {
                return Err(invalid(
                    name,
                    format!("{} values given for a single segment", values.len()),
                ));
            }
            for value in values {
                // matched against the encoded text, as the path is
                let encoded = urlencoding::encode(value).into_owned();
                if !segment.accepts(&encoded) {
                    let regex = segment.regex().map(|r| r.as_str()).unwrap_or_default();
                    return Err(invalid(
                        name,
                        format!("`{}` does not match `({})`", value, regex),
                    ));
                }
                parts.push(encoded);
            }
        }

        Ok(format!("/{}", parts.join("/")))
    }
}

impl<V, T> fmt::Debug for Route<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("params", &self.params)
            .field(
                "aliases",
                &self.aliases.iter().map(|a| a.pattern.as_str()).collect::<Vec<_>>(),
            )
            .field("layouts", &self.layouts.len())
            .field("props", &self.props)
            .finish()
    }
}

/// The outcome of resolving a URL
pub struct Resolution<'r, V, T> {
    route: &'r Route<V, T>,
    params: RawParams,
    location: Location,
}

impl<'r, V, T> Resolution<'r, V, T> {
    pub fn route(&self) -> &'r Route<V, T> {
        self.route
    }

    /// Raw, percent-decoded parameters captured from the path
    pub fn params(&self) -> &RawParams {
        &self.params
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Normalized path, relative to the router's base path
    pub fn path(&self) -> &str {
        &self.location.path
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.location.query.get(key).map(String::as_str)
    }

    pub fn hash(&self) -> Option<&str> {
        self.location.hash.as_deref()
    }

    pub fn name(&self) -> Option<&'r str> {
        self.route.name.as_deref()
    }

    pub fn meta(&self, key: &str) -> Option<&'r str> {
        self.route.get_meta(key)
    }

    /// Whether the URL was only matched by a catch-all route
    pub fn is_fallback(&self) -> bool {
        self.route.is_catch_all()
    }

    /// Returns the matched view, loading it on first use
    pub fn view(&self) -> Result<&'r V, ViewLoadError> {
        self.route.view.load()
    }

    /// Returns the layout views wrapping the matched view, outermost first
    pub fn layouts(&self) -> Result<Vec<&'r V>, ViewLoadError> {
        self.route.layouts.iter().map(|layout| layout.load()).collect()
    }
}

impl<'r, V, T: 'static> Resolution<'r, V, T> {
    /// Props for the matched view
    ///
    /// `Ok(None)` when the route does not forward parameters; otherwise the
    /// route's transformer applied to the captured parameters.
    pub fn props(&self) -> Result<Option<TransformedParams<T>>, TransformError> {
        self.route
            .props
            .transformer()
            .map(|transformer| transformer.apply(&self.params))
            .transpose()
    }
}

impl<V, T> fmt::Debug for Resolution<'_, V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("route", &self.route.pattern)
            .field("params", &self.params)
            .field("location", &self.location)
            .finish()
    }
}

/// Enclosing state while flattening nested records
struct Scope<V> {
    path: String,
    layouts: Vec<Arc<ViewSource<V>>>,
    metadata: HashMap<String, String>,
}

impl<V> Scope<V> {
    fn root() -> Self {
        Self {
            path: String::new(),
            layouts: Vec::new(),
            metadata: HashMap::new(),
        }
    }
}

/// Route table with priority-ordered matching
///
/// `V` is the view type, `T` the output type of the props transformers.
/// Routes are kept sorted by priority, ties broken by registration order;
/// catch-all routes always come last.
pub struct Router<V, T> {
    routes: Vec<Route<V, T>>,
    case_insensitive: bool,
    base_path: Option<String>,
    next_order: usize,
}

impl<V, T> Router<V, T> {
    /// Creates a new router with default settings (case-sensitive, no base path)
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            case_insensitive: false,
            base_path: None,
            next_order: 0,
        }
    }

    /// Creates a router with case-insensitive matching of static segments
    pub fn with_case_insensitive(case_insensitive: bool) -> Self {
        Self::new().with_case_sensitivity(case_insensitive)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Configures case sensitivity (functional builder)
    pub fn with_case_sensitivity(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Sets the prefix the app is mounted under, e.g. `/dashboard`
    ///
    /// `/` (or an empty string) means no base path.
    pub fn with_base_path(mut self, base_path: impl AsRef<str>) -> Self {
        let normalized = normalize_path(base_path.as_ref());
        self.base_path = (normalized != "/").then(|| normalized.into_owned());
        self
    }

    /// Adds a record and its children (functional builder)
    ///
    /// # Errors
    ///
    /// Returns the first invalid pattern found among the record, its
    /// children and their aliases.
    pub fn with_record(mut self, record: RouteRecord<V, T>) -> Result<Self, PatternError> {
        self.add_record(record)?;
        Ok(self)
    }

    /// Adds multiple records at once
    pub fn with_records<I>(mut self, records: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = RouteRecord<V, T>>,
    {
        for record in records {
            self.add_record(record)?;
        }
        Ok(self)
    }

    /// Adds a record in place
    ///
    /// On error the router is left unchanged.
    pub fn add_record(&mut self, record: RouteRecord<V, T>) -> Result<(), PatternError> {
        let mut compiled = Vec::new();
        let mut order = self.next_order;
        compile_record(record, &Scope::root(), &mut order, &mut compiled)?;
        self.next_order = order;

        for route in duplicate_names(&self.routes, &compiled) {
            warn!(
                name = route.name.as_deref().unwrap_or_default(),
                pattern = %route.pattern,
                "duplicate route name"
            );
        }
        for route in &compiled {
            debug!(pattern = %route.pattern, priority = route.priority, "registered route");
        }

        self.routes.extend(compiled);
        self.routes.sort_by_key(Route::sort_key);
        Ok(())
    }

    // ========================================================================
    // Route Matching and Lookup Methods
    // ========================================================================

    /// Resolves a URL to the first matching route
    ///
    /// Routes are checked in priority order; for each, the primary pattern
    /// is tried before its aliases.
    pub fn resolve(&self, url: &str) -> Option<Resolution<'_, V, T>> {
        let location = Location::parse(url, self.base_path.as_deref());
        let found = {
            let segments = location.segments();
            self.routes.iter().find_map(|route| {
                route
                    .match_path_segments(&segments, self.case_insensitive)
                    .map(|params| (route, params))
            })
        };

        match found {
            Some((route, params)) => {
                debug!(url, route = %route.pattern, fallback = route.is_catch_all(), "resolved");
                Some(Resolution {
                    route,
                    params,
                    location,
                })
            }
            None => {
                debug!(url, "no route matches");
                None
            }
        }
    }

    /// Like [`Router::resolve`], but an unmatched URL is an error
    pub fn try_resolve(&self, url: &str) -> Result<Resolution<'_, V, T>, RouteError> {
        self.resolve(url).ok_or_else(|| RouteError::NoMatch {
            path: Location::parse(url, self.base_path.as_deref()).path,
        })
    }

    /// Generates a URL for a named route, including the base path
    ///
    /// # Examples
    ///
    /// ```
    /// use dashroute::{RawParams, RouteError, RouteRecord, Router};
    ///
    /// let router: Router<&str, ()> = Router::new()
    ///     .with_base_path("/dashboard")
    ///     .with_record(RouteRecord::new("/bot-detail/:selfId", "BotDetail").with_name("BotDetail"))
    ///     .unwrap();
    ///
    /// let params: RawParams = [("selfId", "123")].into_iter().collect();
    /// assert_eq!(router.url_for("BotDetail", &params).unwrap(), "/dashboard/bot-detail/123");
    ///
    /// assert!(matches!(
    ///     router.url_for("BotDetail", &RawParams::new()),
    ///     Err(RouteError::MissingParam { .. })
    /// ));
    /// ```
    pub fn url_for(&self, name: &str, params: &RawParams) -> Result<String, RouteError> {
        let route = self
            .route_by_name(name)
            .ok_or_else(|| RouteError::UnknownRoute {
                name: name.to_string(),
            })?;
        let url = route.generate_url(params)?;

        Ok(match &self.base_path {
            Some(base) if url == "/" => base.clone(),
            Some(base) => format!("{}{}", base, url),
            None => url,
        })
    }

    /// Convenience wrapper around [`Router::url_for`] for single-segment values
    pub fn url_for_params(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let params: RawParams = params.iter().copied().collect();
        self.url_for(name, &params)
    }

    /// Gets a route by its name; the highest-priority one if names repeat
    pub fn route_by_name(&self, name: &str) -> Option<&Route<V, T>> {
        self.routes
            .iter()
            .find(|route| route.name.as_deref() == Some(name))
    }

    /// Routes in matching order
    pub fn routes(&self) -> &[Route<V, T>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }
}

impl<V, T> Default for Router<V, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, T> fmt::Debug for Router<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("case_insensitive", &self.case_insensitive)
            .field("base_path", &self.base_path)
            .finish()
    }
}

/// Routes in `added` whose name is already taken, by a registered route or
/// an earlier one in `added`
fn duplicate_names<'a, V, T>(
    registered: &[Route<V, T>],
    added: &'a [Route<V, T>],
) -> Vec<&'a Route<V, T>> {
    added
        .iter()
        .enumerate()
        .filter(|(index, route)| {
            route.name.as_ref().is_some_and(|name| {
                registered
                    .iter()
                    .chain(&added[..*index])
                    .any(|other| other.name.as_ref() == Some(name))
            })
        })
        .map(|(_, route)| route)
        .collect()
}

/// Flattens a record tree into routes
///
/// Records with children become layouts: their view is pushed onto the
/// layout chain and their metadata inherited, but they are not matchable
/// themselves.
fn compile_record<V, T>(
    record: RouteRecord<V, T>,
    scope: &Scope<V>,
    order: &mut usize,
    out: &mut Vec<Route<V, T>>,
) -> Result<(), PatternError> {
    let is_layout = record.is_layout();
    let RouteRecord {
        path,
        name,
        view,
        props,
        children,
        metadata,
        aliases,
    } = record;

    let full_path = join_paths(&scope.path, &path);
    let parsed = parse_pattern(&full_path)?;
    let mut merged = scope.metadata.clone();
    merged.extend(metadata);
    let view = Arc::new(view);

    if is_layout {
        if props.is_enabled() {
            warn!(pattern = %parsed.pattern, "props on a layout record are ignored");
        }
        if name.is_some() || !aliases.is_empty() {
            warn!(pattern = %parsed.pattern, "name and aliases on a layout record are ignored");
        }

        let mut layouts = scope.layouts.clone();
        layouts.push(view);
        let child_scope = Scope {
            path: parsed.pattern,
            layouts,
            metadata: merged,
        };
        return children
            .into_iter()
            .try_for_each(|child| compile_record(child, &child_scope, order, out));
    }

    let aliases = aliases
        .iter()
        .map(|alias| parse_pattern(&join_paths(&scope.path, alias)))
        .collect::<Result<Vec<_>, _>>()?;

    let route = Route {
        priority: calculate_priority(&parsed),
        pattern: parsed.pattern,
        segments: parsed.segments,
        params: parsed.params,
        optional_params: parsed.optional_params,
        name,
        metadata: merged,
        aliases,
        view,
        layouts: scope.layouts.clone(),
        props,
        order: *order,
    };
    *order += 1;
    out.push(route);
    Ok(())
}

// File: src/config.rs
// Purpose: Route table configuration parsing from dashroute.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ViewLoadError;
use crate::kind::{field_constructors, ParamKind, TypedValue};
use crate::record::{Props, RouteRecord};
use crate::transform::ParamTransformer;
use crate::view::LazyView;
use crate::Router;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub views: ViewsConfig,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoutingConfig {
    /// Whether static segments match case-insensitively (default: false)
    #[serde(default = "default_false")]
    pub case_insensitive: bool,

    /// Base path the app is mounted under (e.g., "/dashboard")
    #[serde(default)]
    pub base_path: Option<String>,
}

/// Where lazy views are looked up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Directory holding view files; without it a view loads as its own name
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// File extension of view files (default: "vue")
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// One `[[routes]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub path: String,

    /// View identifier, e.g. "pages/BotDetailView"
    pub view: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Forward route parameters to the view
    #[serde(default = "default_false")]
    pub props: bool,

    /// Parameters converted before forwarding (requires `props = true`)
    #[serde(default)]
    pub params: HashMap<String, ParamKind>,

    /// Load the view on first navigation (default: true)
    #[serde(default = "default_true")]
    pub lazy: bool,

    #[serde(default)]
    pub meta: HashMap<String, String>,

    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub children: Vec<RouteConfig>,
}

// Default values
fn default_extension() -> String {
    "vue".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extension: default_extension(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the default (empty) configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./dashroute.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("dashroute.toml")
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    /// Builds the router described by this configuration
    ///
    /// Views are identified by their configured name; lazy views resolve
    /// to a file under `views.dir` when one is set.
    pub fn build_router(&self) -> Result<Router<String, TypedValue>> {
        let router = Router::with_case_insensitive(self.routing.case_insensitive)
            .with_base_path(self.routing.base_path.as_deref().unwrap_or("/"));

        let records = self.routes.iter().map(|route| route.to_record(&self.views));
        let router = router
            .with_records(records)
            .context("Invalid route pattern in configuration")?;

        debug!(routes = router.len(), "built router from configuration");
        Ok(router)
    }
}

impl RouteConfig {
    /// Converts this entry (and its children) into a route record
    pub fn to_record(&self, views: &ViewsConfig) -> RouteRecord<String, TypedValue> {
        let record = if self.lazy {
            RouteRecord::lazy(self.path.clone(), view_loader(views, &self.view))
        } else {
            RouteRecord::new(self.path.clone(), self.view.clone())
        };

        let mut record = record
            .with_props_mode(self.props_mode())
            .with_children(self.children.iter().map(|child| child.to_record(views)));

        if let Some(name) = &self.name {
            record = record.with_name(name.clone());
        }
        for (key, value) in &self.meta {
            record = record.with_meta(key.clone(), value.clone());
        }
        for alias in &self.aliases {
            record = record.with_alias(alias.clone());
        }
        record
    }

    fn props_mode(&self) -> Props<TypedValue> {
        match (self.props, self.params.is_empty()) {
            (true, true) => Props::Params,
            (true, false) => Props::Transform(ParamTransformer::new(field_constructors(&self.params))),
            (false, true) => Props::Off,
            (false, false) => {
                warn!(path = %self.path, "`params` has no effect without `props = true`");
                Props::Off
            }
        }
    }
}

fn view_loader(views: &ViewsConfig, view: &str) -> LazyView<String> {
    let name = view.to_string();
    match &views.dir {
        None => LazyView::new(view, move || Ok(name.clone())),
        Some(dir) => {
            let file = dir.join(format!("{}.{}", view, views.extension));
            LazyView::new(view, move || {
                if file.is_file() {
                    Ok(file.display().to_string())
                } else {
                    Err(ViewLoadError::new(
                        name.clone(),
                        format!("{} does not exist", file.display()),
                    ))
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DASHBOARD: &str = r#"
        [[routes]]
        path = "/"
        view = "layouts/MainLayout"

          [[routes.children]]
          path = ""
          name = "login"
          view = "pages/LoginView"

          [[routes.children]]
          path = "/index"
          view = "pages/IndexView"

          [[routes.children]]
          path = "/bot-detail/:selfId"
          name = "BotDetail"
          view = "pages/BotDetailView"
          props = true
          params = { selfId = "uint" }

        [[routes]]
        path = "/:catchAll(.*)*"
        view = "pages/NotFoundView"
    "#;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.routing.case_insensitive);
        assert_eq!(config.routing.base_path, None);
        assert_eq!(config.views.extension, "vue");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("  \n").unwrap();
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("does/not/exist/dashroute.toml").unwrap();
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_parse_route_table() {
        let config = Config::parse(DASHBOARD).unwrap();
        assert_eq!(config.routes.len(), 2);

        let detail = &config.routes[0].children[2];
        assert!(detail.props);
        assert!(detail.lazy);
        assert_eq!(detail.params.get("selfId"), Some(&ParamKind::UInt));
    }

    #[test]
    fn test_unknown_param_kind_is_rejected() {
        let toml = r#"
            [[routes]]
            path = "/bot-detail/:selfId"
            view = "pages/BotDetailView"
            props = true
            params = { selfId = "number" }
        "#;
        assert!(Config::parse(toml).is_err());
    }

    #[test]
    fn test_build_router() {
        let router = Config::parse(DASHBOARD).unwrap().build_router().unwrap();
        assert_eq!(router.len(), 4);

        let resolution = router.resolve("/bot-detail/123").unwrap();
        assert_eq!(resolution.view().unwrap(), "pages/BotDetailView");
        assert_eq!(resolution.layouts().unwrap(), vec!["layouts/MainLayout"]);

        let props = resolution.props().unwrap().unwrap();
        assert_eq!(props.get_converted("selfId"), Some(&TypedValue::UInt(123)));

        let fallback = router.resolve("/nonexistent").unwrap();
        assert!(fallback.is_fallback());
        assert_eq!(fallback.view().unwrap(), "pages/NotFoundView");
    }

    #[test]
    fn test_params_without_props_are_ignored() {
        let toml = r#"
            [[routes]]
            path = "/bot-detail/:selfId"
            view = "pages/BotDetailView"
            params = { selfId = "uint" }
        "#;
        let router = Config::parse(toml).unwrap().build_router().unwrap();
        let resolution = router.resolve("/bot-detail/1").unwrap();
        assert!(resolution.props().unwrap().is_none());
    }

    #[test]
    fn test_invalid_pattern_reports_context() {
        let toml = r#"
            [[routes]]
            path = "/bot-detail/:selfId(\\d+"
            view = "pages/BotDetailView"
        "#;
        let error = Config::parse(toml).unwrap().build_router().unwrap_err();
        assert_eq!(error.to_string(), "Invalid route pattern in configuration");
        assert!(format!("{error:#}").contains("unbalanced parenthesis"));
    }

    #[test]
    fn test_view_dir_resolution() {
        let views = ViewsConfig {
            dir: Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("src")),
            extension: "rs".to_string(),
        };

        let found = view_loader(&views, "lib");
        assert!(found.get().unwrap().ends_with("lib.rs"));

        let missing = view_loader(&views, "pages/IndexView");
        let error = missing.get().unwrap_err();
        assert_eq!(error.view, "pages/IndexView");
        assert!(error.reason.ends_with("does not exist"));
    }
}

pub mod resolve;
pub mod routes;
pub mod url;

use std::path::Path;

use anyhow::Result;
use dashroute::{Config, Props, Router, TypedValue};
use tracing::debug;

/// Loads the configuration file and builds its router
pub fn load_router(config: &Path) -> Result<Router<String, TypedValue>> {
    debug!(config = %config.display(), "loading route table");
    Config::load(config)?.build_router()
}

/// Short description of how a route forwards its parameters
pub fn describe_props<T>(props: &Props<T>) -> String {
    match props {
        Props::Off => "-".to_string(),
        Props::Params => "params".to_string(),
        Props::Transform(transformer) => {
            let mut names: Vec<&str> = transformer.constructors().names().collect();
            names.sort_unstable();
            format!("transform({})", names.join(", "))
        }
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use super::load_router;

pub fn execute(config: &Path, url: &str, as_json: bool) -> Result<()> {
    let router = load_router(config)?;
    let resolution = router.try_resolve(url)?;

    let view = resolution.view()?;
    let layouts = resolution.layouts()?;
    let props = resolution
        .props()
        .with_context(|| format!("Failed to build props for {}", resolution.route().pattern))?;

    if as_json {
        let output = json!({
            "path": resolution.path(),
            "route": resolution.route().pattern,
            "name": resolution.name(),
            "view": view,
            "layouts": layouts,
            "params": resolution.params(),
            "props": props,
            "query": resolution.location().query,
            "hash": resolution.hash(),
            "meta": resolution.route().metadata,
            "fallback": resolution.is_fallback(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let heading = if resolution.is_fallback() {
        format!("{} → {} (fallback)", url, resolution.route().pattern).yellow()
    } else {
        format!("{} → {}", url, resolution.route().pattern).green()
    };
    println!("{}", heading.bold());
    println!();

    if let Some(name) = resolution.name() {
        println!("Name:    {}", name.cyan());
    }
    for layout in &layouts {
        println!("Layout:  {}", layout);
    }
    println!("View:    {}", view.cyan());

    let mut params: Vec<_> = resolution.params().iter().collect();
    params.sort_by(|a, b| a.0.cmp(b.0));
    for (name, value) in params {
        println!("Param:   {} = {}", name, value);
    }

    if let Some(props) = props {
        let mut fields: Vec<_> = props.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (name, field) in fields {
            println!("Prop:    {} = {}", name, serde_json::to_string(field)?);
        }
    }

    Ok(())
}

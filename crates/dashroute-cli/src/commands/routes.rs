use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::{describe_props, load_router};

pub fn execute(config: &Path) -> Result<()> {
    let router = load_router(config)?;

    if router.is_empty() {
        println!("{}", "No routes configured".yellow());
        return Ok(());
    }

    println!("{}", format!("{} routes (matching order)", router.len()).green().bold());
    println!();

    for route in router.routes() {
        let mut line = format!(
            "{:>5}  {:<32} {:<16} props: {}",
            route.priority,
            route.pattern.cyan(),
            route.name.as_deref().unwrap_or("-"),
            describe_props(route.props()),
        );
        if route.layout_sources().next().is_some() {
            line.push_str(&format!("  layouts: {}", route.layout_sources().count()));
        }
        if route.is_catch_all() {
            line.push_str(&format!("  {}", "(fallback)".dimmed()));
        }
        println!("{}", line);

        for alias in &route.aliases {
            println!("{:>5}  {} {}", "", "alias".dimmed(), alias.pattern);
        }
    }

    Ok(())
}

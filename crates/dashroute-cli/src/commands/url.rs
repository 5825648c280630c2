use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Result};
use dashroute::{ParamValue, RawParams};

use super::load_router;

pub fn execute(config: &Path, name: &str, params: &[String]) -> Result<()> {
    let router = load_router(config)?;
    let params = parse_params(params)?;

    println!("{}", router.url_for(name, &params)?);
    Ok(())
}

/// Parses `key=value` arguments; a repeated key becomes a repeated value
fn parse_params(args: &[String]) -> Result<RawParams> {
    let mut order: Vec<String> = Vec::new();
    let mut values: HashMap<String, Vec<String>> = HashMap::new();

    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("Invalid parameter `{}`, expected key=value", arg);
        };
        if key.is_empty() {
            bail!("Invalid parameter `{}`, empty key", arg);
        }
        if !values.contains_key(key) {
            order.push(key.to_string());
        }
        values.entry(key.to_string()).or_default().push(value.to_string());
    }

    Ok(order
        .into_iter()
        .filter_map(|key| {
            let mut list = values.remove(&key)?;
            let value = if list.len() == 1 {
                ParamValue::Single(list.remove(0))
            } else {
                ParamValue::Repeated(list)
            };
            Some((key, value))
        })
        .collect())
}

//! config command - Show effective configuration values

use anyhow::{bail, Context as _, Result};

use super::print_json;
use crate::cli::Context;
use crate::core::config::{Config, KEYS};
use crate::store::GitStore;

/// Load configuration, including the repo file when inside a repository.
fn load(ctx: &Context) -> Result<Config> {
    let cwd = ctx.cwd()?;
    let work_dir = GitStore::open(&cwd)
        .ok()
        .map(|store| store.info().work_dir.clone());
    Config::load(work_dir.as_deref()).context("Failed to load config")
}

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let config = load(ctx)?;

    let Some(value) = config.value(key) else {
        bail!(
            "Unknown configuration key: {}\nKnown keys: {}",
            key,
            KEYS.join(", ")
        );
    };

    if ctx.json {
        return print_json(&value);
    }
    if !value.is_empty() {
        println!("{}", value);
    }
    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let config = load(ctx)?;

    if ctx.json {
        let values: serde_json::Map<String, serde_json::Value> = KEYS
            .iter()
            .filter_map(|key| {
                config
                    .value(key)
                    .map(|v| (key.to_string(), serde_json::Value::String(v)))
            })
            .collect();
        return print_json(&values);
    }

    if !ctx.quiet {
        match config.global_config_loaded_from() {
            Some(path) => println!("# global: {}", path.display()),
            None => println!("# global: (none)"),
        }
        match config.repo_config_loaded_from() {
            Some(path) => println!("# repo: {}", path.display()),
            None => println!("# repo: (none)"),
        }
    }

    for key in KEYS {
        let value = config.value(key).unwrap_or_default();
        if value.is_empty() {
            println!("{} = (not set)", key);
        } else {
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}

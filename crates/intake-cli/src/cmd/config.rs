use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use intake_core::config::{EngineConfig, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
    /// Check the configuration for suspicious values
    Validate,
}

pub fn run(path: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Init => init(path, json),
        ConfigSubcommand::Show => show(path, json),
        ConfigSubcommand::Validate => validate(path, json),
    }
}

fn load(path: &Path) -> anyhow::Result<EngineConfig> {
    EngineConfig::load_or_default(path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

fn init(path: &Path, json: bool) -> anyhow::Result<()> {
    let created = !path.exists();
    if created {
        EngineConfig::default()
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if json {
        print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "created": created,
        }))?;
    } else if created {
        println!("Wrote default config to {}", path.display());
    } else {
        println!("Config already exists at {}", path.display());
    }
    Ok(())
}

fn show(path: &Path, json: bool) -> anyhow::Result<()> {
    let config = load(path)?;
    if json {
        print_json(&config)?;
    } else {
        let source = if path.exists() {
            path.display().to_string()
        } else {
            "built-in defaults".to_string()
        };
        println!("# source: {source}");
        print!("{}", serde_yaml::to_string(&config)?);
    }
    Ok(())
}

fn validate(path: &Path, json: bool) -> anyhow::Result<()> {
    let config = load(path)?;
    let warnings = config.validate();
    let errors = warnings
        .iter()
        .filter(|w| w.level == WarnLevel::Error)
        .count();

    if json {
        print_json(&serde_json::json!({
            "valid": errors == 0,
            "warnings": warnings,
        }))?;
    } else if warnings.is_empty() {
        println!("Config OK");
    } else {
        for w in &warnings {
            let tag = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("{tag}: {}", w.message);
        }
    }

    if errors > 0 {
        anyhow::bail!("config has {errors} error(s)");
    }
    Ok(())
}

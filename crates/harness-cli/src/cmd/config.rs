use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use harness_core::{
    config::{self, ConfigSource, WarnLevel},
    paths,
};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration and where it came from
    Show,

    /// Validate the config document for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let resolved = config::resolve(root);
    if json {
        return print_json(&resolved);
    }

    let cfg = &resolved.config;
    match resolved.source {
        ConfigSource::Document => println!("Source: {}", paths::CONFIG_FILE),
        ConfigSource::Defaults => println!("Source: built-in defaults"),
    }
    println!("strictness:                  {}", cfg.strictness);
    println!("feature_enforcement:         {}", cfg.feature_enforcement);
    println!("init_script_execution:       {}", cfg.init_script_execution);
    println!("baseline_tests_on_startup:   {}", cfg.baseline_tests_on_startup);
    println!("auto_progress_logging:       {}", cfg.auto_progress_logging);
    println!("auto_checkpoint_suggestions: {}", cfg.auto_checkpoint_suggestions);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let path = paths::config_path(root);
    if !path.exists() {
        if json {
            print_json(&serde_json::json!({ "warnings": [], "source": "defaults" }))?;
        } else {
            println!("No {} found; built-in defaults apply.", paths::CONFIG_FILE);
        }
        return Ok(());
    }

    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let warnings = config::validate_document(&data);
    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let label = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("{label}: {}", w.message);
        }
    }

    if has_errors {
        anyhow::bail!("{} is invalid", paths::CONFIG_FILE);
    }
    Ok(())
}

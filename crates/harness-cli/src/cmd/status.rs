use crate::output::{print_json, print_table};
use harness_core::{
    config::{self, ConfigSource},
    feature::{ChecklistSummary, FeatureStore, SUMMARY_NEXT_LIMIT},
    paths,
    probe::Probe,
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct StatusOutput<'a> {
    root: String,
    initialized: bool,
    strictness: String,
    config_source: ConfigSource,
    features_file: &'static str,
    features: Option<&'a ChecklistSummary>,
    current: Option<String>,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let initialized = paths::is_initialized(root);
    let resolved = config::resolve(root);

    let store = FeatureStore::new(root);
    let (checklist, load_error) = match store.load() {
        Probe::Ready(c) => (Some(c), None),
        Probe::Unavailable => (None, None),
        Probe::Failed(reason) => (None, Some(reason)),
    };
    let summary = checklist.as_ref().map(|c| c.summary());
    let current = checklist
        .as_ref()
        .and_then(|c| c.current_in_progress())
        .map(|f| f.id.clone());

    if json {
        return print_json(&StatusOutput {
            root: root.display().to_string(),
            initialized,
            strictness: resolved.config.strictness.to_string(),
            config_source: resolved.source,
            features_file: paths::FEATURES_FILE,
            features: summary.as_ref(),
            current,
        });
    }

    println!("Root:        {}", root.display());
    println!(
        "Harness:     {}",
        if initialized { "initialized" } else { "not initialized (run /harness:init)" }
    );
    let source = match resolved.source {
        ConfigSource::Document => paths::CONFIG_FILE,
        ConfigSource::Defaults => "defaults",
    };
    println!("Mode:        {} ({source})", resolved.config.strictness);

    if let Some(reason) = load_error {
        println!("\n{} could not be read: {reason}", paths::FEATURES_FILE);
        return Ok(());
    }
    let Some(summary) = summary else {
        println!("\nNo {} yet.", paths::FEATURES_FILE);
        return Ok(());
    };

    println!(
        "Features:    {} total | {} passing | {} failing | {} in progress | {} not started",
        summary.total, summary.passing, summary.failing, summary.in_progress, summary.not_started
    );
    match current {
        Some(id) => println!("Current:     {id}"),
        None => println!("Current:     none"),
    }

    if !summary.next_items.is_empty() {
        println!("\nNext priority (up to {SUMMARY_NEXT_LIMIT}):");
        let rows = summary
            .next_items
            .iter()
            .map(|f| {
                vec![
                    f.id.clone(),
                    f.status.to_string(),
                    f.name.clone(),
                    f.short_description(),
                ]
            })
            .collect();
        print_table(&["ID", "STATUS", "NAME", "DESCRIPTION"], rows);
    }

    if !summary.anomalies.is_empty() {
        println!("\nWarnings:");
        for a in &summary.anomalies {
            println!("  - {a}");
        }
    }

    Ok(())
}

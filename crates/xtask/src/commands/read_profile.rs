//! Read and inspect saved loadout profiles
//!
//! Loads a `{name}.ron` or `{name}.bin` profile and displays its tags, states
//! and per-agent loadouts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use loadout_content::ContentFactory;
use loadout_core::{CatalogSnapshot, ItemCatalog, ItemKindId, LoadoutManager};

use crate::{dirs, utils};

/// Read and inspect a saved loadout profile
#[derive(Parser)]
pub struct ReadProfile {
    /// Profile name (looked up in the profile directory) or path to a profile file
    #[arg(value_name = "PROFILE")]
    profile: String,

    /// Custom profile directory (defaults to platform-specific location)
    #[arg(short, long, value_name = "DIR")]
    profile_dir: Option<PathBuf>,

    /// Content directory used to label item kinds
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Summary view (tags, states, loadouts)
    Summary,
    /// Full JSON output
    Json,
    /// Pretty-printed debug format
    Debug,
}

impl ReadProfile {
    pub fn execute(self) -> Result<()> {
        let profile_dir = self.profile_dir.unwrap_or_else(dirs::profile_dir);
        let (path, manager) = utils::load_profile(&self.profile, &profile_dir)?;

        let size = std::fs::metadata(&path)
            .with_context(|| format!("Failed to stat profile: {}", path.display()))?
            .len();

        println!("{} {}", style("Profile File:").bold().cyan(), path.display());
        println!(
            "{} {}",
            style("File Size:").bold().cyan(),
            utils::format_bytes(size)
        );
        println!();

        match self.format {
            OutputFormat::Summary => {
                let data_dir = self.data_dir.unwrap_or_else(dirs::content_dir);
                // Labels are cosmetic; fall back to raw ids without a catalog.
                let catalog = ContentFactory::new(data_dir).load_catalog().ok();
                print_summary(&manager, catalog.as_ref());
            }
            OutputFormat::Json => print_json(&manager)?,
            OutputFormat::Debug => print_debug(&manager),
        }

        Ok(())
    }
}

fn kind_label(catalog: Option<&CatalogSnapshot>, kind: ItemKindId) -> String {
    catalog
        .and_then(|catalog| catalog.definition(kind))
        .map(|def| def.label.clone())
        .unwrap_or_else(|| format!("kind #{}", kind.0))
}

fn print_summary(manager: &LoadoutManager, catalog: Option<&CatalogSnapshot>) {
    println!("{}", style("=== Loadout Profile Summary ===").bold().green());
    println!();

    println!("{}", style("Tags:").bold().yellow());
    if manager.tags.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for (id, tag) in manager.tags.iter() {
        println!("  [{}] {}", id.0, style(tag.name()).bold());
        for item in &tag.required_items {
            let filter = item.filter();
            println!(
                "      {} x{}  quality {}..{}  hp {:.0}%..{:.0}%{}",
                kind_label(catalog, item.kind()),
                item.quantity(),
                filter.quality_range().min,
                filter.quality_range().max,
                filter.hp_range().min * 100.0,
                filter.hp_range().max * 100.0,
                if item.randomize_material() {
                    "  (random material)"
                } else {
                    ""
                },
            );
        }
    }
    println!();

    println!("{}", style("States:").bold().yellow());
    if manager.states.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for (id, state) in manager.states.iter() {
        let overrides: Vec<String> = state
            .overrides()
            .map(|(tag, active)| {
                let name = manager
                    .tags
                    .get(tag)
                    .map(|tag| tag.name())
                    .unwrap_or("?");
                format!("{}={}", name, if active { "on" } else { "off" })
            })
            .collect();
        println!("  [{}] {}  {}", id.0, style(state.name()).bold(), overrides.join(", "));
    }
    println!();

    println!("{}", style("Loadouts:").bold().yellow());
    for (agent, loadout) in manager.loadouts() {
        let current = loadout.current_state();
        println!(
            "  {} - state: {}",
            style(agent).bold(),
            manager.states.label(current)
        );
        for element in loadout.all_elements() {
            let name = manager
                .tags
                .get(element.tag())
                .map(|tag| tag.name())
                .unwrap_or("<missing tag>");
            let marker = if element.is_active(current, &manager.states) {
                style("●").green()
            } else {
                style("○").dim()
            };
            println!(
                "      {} {}  ({})",
                marker,
                name,
                element.state_label(current, &manager.states)
            );
        }
    }
    println!();
}

fn print_json(manager: &LoadoutManager) -> Result<()> {
    let json =
        serde_json::to_string_pretty(manager).context("Failed to serialize profile to JSON")?;
    println!("{}", json);
    Ok(())
}

fn print_debug(manager: &LoadoutManager) {
    println!("{:#?}", manager);
}

//! Encumbrance report for the agents of a content directory
//!
//! Shows what every agent actually carries against its capacity and, when a
//! profile is given, what its loadout would weigh under the current (or a
//! chosen) state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use loadout_content::ContentFactory;
use loadout_core::{
    ActiveState, Agent, AgentProfile, BudgetReport, CapacityCalculator, DefListCache, Env,
    EncumbranceReport, LoadoutManager,
};

use crate::{dirs, utils};

/// Report carried mass and bulk against capacity for every agent
#[derive(Parser)]
pub struct Encumbrance {
    /// Content directory (defaults to $LOADOUT_DATA_DIR or the shipped data)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Profile whose loadouts are evaluated hypothetically
    #[arg(short, long, value_name = "PROFILE")]
    profile: Option<String>,

    /// Custom profile directory (defaults to platform-specific location)
    #[arg(long, value_name = "DIR")]
    profile_dir: Option<PathBuf>,

    /// Evaluate loadouts under this state name instead of each loadout's own
    #[arg(short, long, value_name = "STATE", requires = "profile")]
    state: Option<String>,

    /// Only report this agent id
    #[arg(short, long, value_name = "ID")]
    agent: Option<u32>,
}

impl Encumbrance {
    pub fn execute(self) -> Result<()> {
        let factory = ContentFactory::new(self.data_dir.unwrap_or_else(dirs::content_dir));
        let config = factory.load_config()?;
        let modules = factory.load_modules()?;
        let catalog = factory.load_catalog()?;
        let agents = factory.load_agents()?;

        let cache = DefListCache::new();
        let lists = cache
            .get_or_build(&Env::with_all(&catalog, &modules), &config)
            .context("Failed to classify item catalog")?;
        let calc = CapacityCalculator::from_lists(&catalog, lists, &config);

        let manager = match &self.profile {
            Some(profile) => {
                let profile_dir = self.profile_dir.clone().unwrap_or_else(dirs::profile_dir);
                let (path, manager) = utils::load_profile(profile, &profile_dir)?;
                println!("{} {}", style("Profile:").bold().cyan(), path.display());
                Some(manager)
            }
            None => None,
        };

        let state = match (&self.state, &manager) {
            (Some(name), Some(manager)) => {
                let id = manager
                    .states
                    .find_by_name(name)
                    .with_context(|| format!("Unknown state: {}", name))?;
                Some(ActiveState::Named(id))
            }
            _ => None,
        };

        println!("{} {}", style("Data:").bold().cyan(), factory.data_dir().display());
        println!("{} {}", style("Formula:").bold().cyan(), calc.family());
        println!(
            "{} {}",
            style("Boosting apparel:").bold().cyan(),
            lists.mass_boosts.len()
        );
        println!();

        let selected: Vec<&AgentProfile> = agents
            .iter()
            .filter(|agent| self.agent.is_none_or(|id| agent.id.0 == id))
            .collect();
        if selected.is_empty() {
            println!("{}", style("No matching agents").dim());
            return Ok(());
        }

        for agent in selected {
            report_agent(&calc, agent, manager.as_ref(), state)?;
        }

        Ok(())
    }
}

fn report_agent(
    calc: &CapacityCalculator<'_>,
    agent: &AgentProfile,
    manager: Option<&LoadoutManager>,
    state: Option<ActiveState>,
) -> Result<()> {
    println!(
        "{} {} (body size {:.2})",
        style(&agent.name).bold().green(),
        style(agent.id).dim(),
        agent.body_size
    );

    let actual = calc
        .actual_report(agent)
        .with_context(|| format!("Failed to evaluate what {} carries", agent.name))?;
    print_report("carried", &actual);

    let Some(manager) = manager else {
        println!();
        return Ok(());
    };
    if !agent.is_valid_loadout_holder() {
        println!("  {}", style("cannot hold a loadout").dim());
        println!();
        return Ok(());
    }
    let Some(loadout) = manager.loadout(agent.id) else {
        println!("  {}", style("no loadout in profile").dim());
        println!();
        return Ok(());
    };

    let state = state.unwrap_or(loadout.current_state());
    let items = loadout.items_with(state, &manager.tags, &manager.states);
    let planned = calc
        .report(agent, &items)
        .with_context(|| format!("Failed to evaluate the loadout of {}", agent.name))?;
    print_report(&format!("loadout ({})", manager.states.label(state)), &planned);
    println!();
    Ok(())
}

fn print_report(label: &str, report: &EncumbranceReport) {
    print_budget(label, "mass", &report.mass);
    if let Some(bulk) = &report.bulk {
        print_budget(label, "bulk", bulk);
    }
}

fn print_budget(label: &str, measure: &str, budget: &BudgetReport) {
    println!(
        "  {:<24} {:<4} {:>7.2} / {:<7.2} {}",
        label,
        measure,
        budget.load,
        budget.capacity,
        utils::styled_ratio(budget.unbounded_ratio())
    );
}

//! tree command - Print the resolved requirements tree

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::requirement::Requirement;
use crate::core::types::StructureId;
use crate::provider::{RequirementsTagProvider, StructureRequirementsProvider};
use crate::tracker::create_tracker;

/// Resolve and print the requirements forest.
pub fn tree(ctx: &Context, structure: Option<i64>, json: bool) -> Result<()> {
    let config = super::tracker_config()?;
    let structure_id = match structure {
        Some(id) => Some(StructureId::new(id).context("invalid --structure value")?),
        None => config.structure_id,
    };
    let provider = StructureRequirementsProvider::new(
        create_tracker(&config),
        config.project.clone(),
        structure_id,
    );

    let rt = tokio::runtime::Runtime::new()?;
    let requirements = rt.block_on(provider.requirements())?;

    if json {
        println!("{}", serde_json::to_string_pretty(requirements.as_ref())?);
        return Ok(());
    }

    if requirements.is_empty() {
        if !ctx.quiet {
            println!("No requirements resolved");
        }
        return Ok(());
    }
    for requirement in requirements.iter() {
        print_node(requirement, 0);
    }
    Ok(())
}

/// Print one subtree with two-space indentation per level.
fn print_node(requirement: &Requirement, depth: usize) {
    let indent = "  ".repeat(depth);
    let card = requirement
        .card_number()
        .map(|card| format!(" [{}]", card))
        .unwrap_or_default();
    println!(
        "{}{}{} ({})",
        indent,
        requirement.name(),
        card,
        requirement.requirement_type()
    );
    for child in requirement.children() {
        print_node(child, depth + 1);
    }
}

//! structures command - List the Structure boards on the tracker

use anyhow::Result;

use crate::cli::Context;
use crate::tracker::create_tracker;

/// List available structure ids in the tracker's index order.
pub fn structures(ctx: &Context) -> Result<()> {
    let config = super::tracker_config()?;
    let tracker = create_tracker(&config);

    let rt = tokio::runtime::Runtime::new()?;
    let ids = rt.block_on(tracker.list_structure_ids())?;

    if ids.is_empty() {
        if !ctx.quiet {
            println!("No structures available");
        }
        return Ok(());
    }

    if !ctx.quiet {
        println!("Structures on {}:", config.url);
    }
    for id in &ids {
        match config.structure_id {
            Some(configured) if configured == *id => println!("{} (configured)", id),
            _ => println!("{}", id),
        }
    }
    Ok(())
}

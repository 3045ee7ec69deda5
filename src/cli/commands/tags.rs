//! tags command - Resolve traceability tags for issue keys

use anyhow::Result;

use crate::cli::Context;
use crate::core::types::TestOutcome;
use crate::provider::RequirementsTagProvider;

/// Resolve the tag union for an ad-hoc outcome carrying the given keys.
pub fn tags(ctx: &Context, keys: &[String]) -> Result<()> {
    let provider = super::provider()?;
    let outcome = TestOutcome::named("girder tags").with_issue_keys(keys.iter().cloned());

    let rt = tokio::runtime::Runtime::new()?;
    let tags = rt.block_on(provider.tags_for(&outcome))?;

    if tags.is_empty() {
        if !ctx.quiet {
            println!("No tags resolved");
        }
        return Ok(());
    }

    // Stable output: sets have no order of their own.
    let mut sorted: Vec<_> = tags.into_iter().collect();
    sorted.sort_by(|a, b| {
        a.tag_type()
            .cmp(b.tag_type())
            .then_with(|| a.name().cmp(b.name()))
    });
    for tag in sorted {
        println!("{}", tag);
    }
    Ok(())
}

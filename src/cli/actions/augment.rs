use crate::augmentor::{run, table::default_table};
use crate::cli::actions::Action;
use anyhow::Result;
use tracing::info;

/// Handle the augment action
pub fn handle(action: Action) -> Result<()> {
    if let Action::Augment { root } = action {
        info!("extending generated route helpers with form definitions");

        let summary = run(&default_table(), &root)?;

        // Warnings are reported but do not change the exit code; build
        // integrations read the counts from this line if they care.
        println!(
            "route-form augmentation completed: {} patched, {} already present, {} warnings",
            summary.patched, summary.already_present, summary.warnings
        );
    }

    Ok(())
}

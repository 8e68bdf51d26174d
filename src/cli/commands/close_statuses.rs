//! Close-statuses command implementation.

use anyhow::Result;

use crate::cli::{Context, ProjectArgs};

/// Execute the close-statuses command, one status per line.
///
/// Reads the local checkout as is; no pull.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn execute(args: &ProjectArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store(&args.project, false)?;
    for status in store.close_status_vocabulary()? {
        println!("{status}");
    }
    Ok(())
}

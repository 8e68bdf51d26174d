//! Take command implementation.

use anyhow::Result;

use crate::cli::{Context, TicketArgs};
use crate::prompt::ConsoleConfirm;

/// Execute the take command: assign the ticket to the configured user.
///
/// # Errors
///
/// Returns an error if the ticket is not found or the write or commit fails.
pub fn execute(args: &TicketArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store(&args.project.project, true)?;
    let outcome = super::mutator(ctx, &store).take(&args.id, &mut ConsoleConfirm::stdio())?;
    super::report(outcome);
    Ok(())
}

//! Show command implementation.

use anyhow::Result;

use crate::cli::{Context, TicketArgs};
use crate::format::format_ticket;

/// Execute the show command.
///
/// Lookup is by id only; the status filter does not apply.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the ticket is not found.
pub fn execute(args: &TicketArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store(&args.project.project, true)?;
    let file = store.get(&args.id)?;
    println!("{}", format_ticket(&file.ticket));
    Ok(())
}

//! Comment command implementation.

use anyhow::Result;

use crate::cli::{CommentArgs, Context};
use crate::prompt::ConsoleConfirm;

/// Execute the comment command.
///
/// # Errors
///
/// Returns an error if the text is blank, the ticket is not found, or the
/// write or commit fails.
pub fn execute(args: &CommentArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store(&args.ticket.project.project, true)?;
    let outcome = super::mutator(ctx, &store).comment(
        &args.ticket.id,
        &args.text,
        &mut ConsoleConfirm::stdio(),
    )?;
    super::report(outcome);
    Ok(())
}

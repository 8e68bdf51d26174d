//! Close command implementation.

use anyhow::Result;

use crate::cli::{CloseArgs, Context};
use crate::prompt::ConsoleConfirm;

/// Execute the close command.
///
/// The close statuses already used in the project are printed first so
/// the operator can tell whether `--close-status` will be accepted.
///
/// # Errors
///
/// Returns an error if the close status is unknown, the ticket is not
/// found, or the write or commit fails.
pub fn execute(args: &CloseArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store(&args.ticket.project.project, true)?;

    let vocabulary = store.close_status_vocabulary()?;
    if vocabulary.is_empty() {
        println!("No close status in use in this project.");
    } else {
        let statuses: Vec<_> = vocabulary.into_iter().collect();
        println!("Valid close statuses: {}", statuses.join(", "));
    }

    let outcome = super::mutator(ctx, &store).close(
        &args.ticket.id,
        args.close_status.as_deref(),
        &mut ConsoleConfirm::stdio(),
    )?;
    super::report(outcome);
    Ok(())
}

//! Command implementations.

pub mod close;
pub mod close_statuses;
pub mod comment;
pub mod list;
pub mod show;
pub mod take;

use pag_off_lib::{Git, Mutator, Outcome, TicketStore};

use crate::cli::Context;

/// Mutator for `store` acting as the configured user.
fn mutator<'a>(ctx: &Context, store: &'a TicketStore) -> Mutator<'a> {
    Mutator::new(store, &Git, ctx.config.user.clone()).with_interrupt(ctx.interrupt.clone())
}

fn report(outcome: Outcome) {
    println!("{outcome}");
}

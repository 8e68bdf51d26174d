//! List command implementation.
//!
//! Primary discovery interface: status, tag, people and milestone filters
//! over every ticket in the project, ordered by id.

use anyhow::Result;
use pag_off_lib::{TicketFilters, filter_tickets, parse_tags};

use crate::cli::{Context, ListArgs};
use crate::format::format_ticket_line;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if a filter value is invalid or the store cannot be
/// opened.
pub fn execute(args: &ListArgs, ctx: &Context) -> Result<()> {
    // Reject bad filter values before touching the checkout
    let filters = build_filters(args, &ctx.config.user.name)?;
    let store = ctx.open_store(&args.project.project, true)?;

    let tickets = filter_tickets(store.enumerate()?, &filters);
    tracing::debug!(status = %filters.status, count = tickets.len(), "Tickets matched");

    if tickets.is_empty() {
        println!("No tickets found.");
    } else {
        for ticket in &tickets {
            println!("{}", format_ticket_line(ticket));
        }
        println!("\n{} ticket(s)", tickets.len());
    }

    Ok(())
}

/// Convert CLI args to filters; `--mine` becomes an assignee filter on
/// `user`.
fn build_filters(args: &ListArgs, user: &str) -> Result<TicketFilters> {
    let assignee = if args.mine {
        Some(user.to_string())
    } else {
        args.assignee.clone()
    };

    Ok(TicketFilters {
        status: args.status.parse()?,
        tags: args.tags.as_deref().map(parse_tags).unwrap_or_default(),
        assignee,
        author: args.author.clone(),
        milestone: args.milestone.clone(),
        order: args.order.parse()?,
    })
}

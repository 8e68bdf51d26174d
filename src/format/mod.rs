//! Output formatting for `pag_off`.
//!
//! Everything is plain text: one line per ticket for listings, the full
//! ticket with its comments for `show` and for confirmation previews.

mod text;

pub use text::{format_ticket, format_ticket_at, format_ticket_line, humanize, humanize_at};

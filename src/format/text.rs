//! Plain text rendering of tickets for the terminal.

use chrono::{DateTime, Utc};
use pag_off_lib::Ticket;
use pag_off_lib::util::parse_epoch;

/// Separator printed above each comment.
const COMMENT_RULE: &str = "        --------------------";

/// Render an epoch-seconds string relative to now ("3 days ago").
///
/// Returns an empty string for missing or unparsable timestamps.
#[must_use]
pub fn humanize(epoch: &str) -> String {
    humanize_at(epoch, Utc::now())
}

/// Like [`humanize`], relative to `now`.
#[must_use]
pub fn humanize_at(epoch: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_epoch(epoch) else {
        return String::new();
    };
    let delta = now.signed_duration_since(then).num_seconds();
    let future = delta < 0;
    let secs = delta.unsigned_abs();

    let phrase = match secs {
        0..=9 => return "just now".to_string(),
        10..=44 => "seconds".to_string(),
        45..=89 => "a minute".to_string(),
        90..=2_699 => format!("{} minutes", secs.div_ceil(60).max(2)),
        2_700..=5_399 => "an hour".to_string(),
        5_400..=79_199 => format!("{} hours", (secs / 3_600).max(2)),
        79_200..=129_599 => "a day".to_string(),
        129_600..=2_591_999 => format!("{} days", (secs / 86_400).max(2)),
        2_592_000..=3_887_999 => "a month".to_string(),
        3_888_000..=31_535_999 => format!("{} months", (secs / 2_592_000).max(2)),
        31_536_000..=47_303_999 => "a year".to_string(),
        _ => format!("{} years", (secs / 31_536_000).max(2)),
    };

    if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

/// One-line summary used by `list`.
///
/// Format: `#{id} [{status}] {title} ({assignee}, {last updated})`
#[must_use]
pub fn format_ticket_line(ticket: &Ticket) -> String {
    let mut line = format!("#{:<5} [{}] {}", ticket.id, ticket.status, ticket.title);
    let mut details = Vec::new();
    if let Some(assignee) = ticket.assignee_name() {
        details.push(format!("@{assignee}"));
    }
    let updated = humanize(&ticket.last_updated);
    if !updated.is_empty() {
        details.push(updated);
    }
    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }
    line
}

/// Full ticket with its comments, as shown by `show` and before
/// confirming a change.
#[must_use]
pub fn format_ticket(ticket: &Ticket) -> String {
    format_ticket_at(ticket, Utc::now())
}

/// Like [`format_ticket`], with relative times computed against `now`.
#[must_use]
pub fn format_ticket_at(ticket: &Ticket, now: DateTime<Utc>) -> String {
    let priority = ticket
        .priority
        .map_or_else(String::new, |p| p.to_string());
    let status = ticket.close_status.as_deref().map_or_else(
        || ticket.status.clone(),
        |cs| format!("{} ({cs})", ticket.status),
    );

    let mut out = format!("#{}: {}\n\n", ticket.id, ticket.title);
    let fields = [
        ("From:", ticket.user.to_string()),
        ("Date:", humanize_at(&ticket.date_created, now)),
        ("Tags:", ticket.tags.join(", ")),
        (
            "Assignee:",
            ticket.assignee.as_ref().map(ToString::to_string).unwrap_or_default(),
        ),
        ("Private:", ticket.private.to_string()),
        ("Status:", status),
        ("Priority:", priority),
        ("Blocks:", ticket.blocks.join(", ")),
        ("Depends:", ticket.depends.join(", ")),
        ("Milestone:", ticket.milestone.clone().unwrap_or_default()),
        ("Last update:", humanize_at(&ticket.last_updated, now)),
    ];
    for (label, value) in fields {
        out.push_str(format!("{label:<12}{value}").trim_end());
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&ticket.content);

    for comment in &ticket.comments {
        out.push_str(&format!(
            "\n{COMMENT_RULE}\n* {}  -- {}\n\n{}",
            comment.user,
            humanize_at(&comment.date_created, now),
            comment.comment
        ));
    }
    out
}

//! Comment, take and close.
//!
//! Every flow has the same shape: load the ticket, change it in memory,
//! ask for confirmation, then write the file and commit it. Declining
//! leaves the file and the repository untouched.

use std::fmt;
use std::fs;

use crate::error::{PagOffError, Result};
use crate::interrupt::Interrupt;
use crate::model::{Comment, Person, Ticket};
use crate::store::{TicketFile, TicketStore, write_atomic};
use crate::util::epoch_now;
use crate::vcs::VersionControl;

/// Status written when closing, capitalised like the tracker's own.
pub const CLOSED_STATUS: &str = "Closed";

/// Asks the operator whether to apply a pending change.
pub trait Confirm {
    /// Show `ticket` as it will be written and ask `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn confirm(&mut self, ticket: &Ticket, prompt: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&Ticket, &str) -> Result<bool>,
{
    fn confirm(&mut self, ticket: &Ticket, prompt: &str) -> Result<bool> {
        self(ticket, prompt)
    }
}

/// How a mutation ended when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Canceled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "done"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

/// Applies mutations to one project's tickets on behalf of `user`.
pub struct Mutator<'a> {
    store: &'a TicketStore,
    vcs: &'a dyn VersionControl,
    user: Person,
    interrupt: Interrupt,
}

impl<'a> Mutator<'a> {
    #[must_use]
    pub fn new(store: &'a TicketStore, vcs: &'a dyn VersionControl, user: Person) -> Self {
        Self {
            store,
            vcs,
            user,
            interrupt: Interrupt::new(),
        }
    }

    /// Share an interrupt token with the signal handler.
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Append a comment from the local user.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for blank text, `TicketNotFound`, or any
    /// persistence or commit failure.
    pub fn comment(&self, id: &str, text: &str, confirm: &mut dyn Confirm) -> Result<Outcome> {
        if text.trim().is_empty() {
            return Err(PagOffError::validation("comment", "cannot be empty"));
        }
        let mut file = self.store.get(id)?;
        file.ticket
            .comments
            .push(Comment::new(&self.user, text, epoch_now()));

        let message = format!("Updated issue {}: {}", file.file_name(), file.ticket.title);
        self.finish(file, "Confirm comment [y/N]: ", &message, |_, _| {}, confirm)
    }

    /// Assign the ticket to the local user.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound`, or any persistence or commit failure.
    pub fn take(&self, id: &str, confirm: &mut dyn Confirm) -> Result<Outcome> {
        let mut file = self.store.get(id)?;
        let name = &self.user.name;
        let text = format!("**Metadata Update from @{name}**:\n- Issue assigned to {name}");
        file.ticket
            .comments
            .push(Comment::new(&self.user, text, epoch_now()).notification());
        file.ticket.assignee = Some(self.user.clone());

        let prompt = format!("Confirm assigning this ticket to {name} [y/N]: ");
        let message = format!("Assigned issue {}: {}", file.file_name(), file.ticket.title);
        self.finish(file, &prompt, &message, |_, _| {}, confirm)
    }

    /// Close the ticket, optionally recording why.
    ///
    /// `close_status` must already be in use somewhere in the project.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCloseStatus` for an unknown close status,
    /// `TicketNotFound`, or any persistence or commit failure.
    pub fn close(
        &self,
        id: &str,
        close_status: Option<&str>,
        confirm: &mut dyn Confirm,
    ) -> Result<Outcome> {
        let mut file = self.store.get(id)?;

        if let Some(wanted) = close_status {
            let vocabulary = self.store.close_status_vocabulary()?;
            if !vocabulary.contains(wanted) {
                tracing::warn!(close_status = wanted, "Rejecting unknown close status");
                return Err(PagOffError::InvalidCloseStatus {
                    value: wanted.to_string(),
                    allowed: vocabulary.into_iter().collect(),
                });
            }
        }

        let mut text = format!(
            "**Metadata Update from @{}**:\n- Issue status updated to: {CLOSED_STATUS} (was: {})",
            self.user.name, file.ticket.status
        );
        if let Some(cs) = close_status {
            text.push_str(&format!("\n- Issue close_status updated to: {cs}"));
        }
        file.ticket
            .comments
            .push(Comment::new(&self.user, text, epoch_now()).notification());
        file.ticket.status = CLOSED_STATUS.to_string();
        if let Some(cs) = close_status {
            file.ticket.close_status = Some(cs.to_string());
        }

        let prompt = close_status.map_or_else(
            || "Confirm closing this ticket [y/N]: ".to_string(),
            |cs| format!("Confirm closing this ticket as {cs} [y/N]: "),
        );
        let message = format!("Close issue {}: {}", file.file_name(), file.ticket.title);
        self.finish(
            file,
            &prompt,
            &message,
            |ticket, now| ticket.closed_at = Some(now.to_string()),
            confirm,
        )
    }

    /// Confirm, then write and commit. `on_confirm` stamps fields that
    /// carry the confirmation time; `last_updated` is always stamped.
    fn finish(
        &self,
        mut file: TicketFile,
        prompt: &str,
        message: &str,
        on_confirm: impl FnOnce(&mut Ticket, &str),
        confirm: &mut dyn Confirm,
    ) -> Result<Outcome> {
        if !confirm.confirm(&file.ticket, prompt)? {
            tracing::info!(id = file.ticket.id, "Mutation canceled");
            return Ok(Outcome::Canceled);
        }
        self.interrupt.check()?;

        let now = epoch_now();
        on_confirm(&mut file.ticket, &now);
        file.ticket.last_updated = now;

        self.interrupt.critical(|| {
            let original = fs::read(&file.path)?;
            TicketStore::persist(&file.path, &file.ticket)?;
            if let Err(e) = self.vcs.commit_file(&file.path, message) {
                tracing::warn!(path = %file.path.display(), "Commit failed, restoring ticket file");
                write_atomic(&file.path, &original)?;
                return Err(e);
            }
            Ok(())
        })?;

        if self.interrupt.is_interrupted() {
            tracing::warn!(id = file.ticket.id, "Interrupted after the ticket was saved and committed");
            return Err(PagOffError::Interrupted);
        }
        tracing::info!(id = file.ticket.id, "Mutation committed");
        Ok(Outcome::Done)
    }
}

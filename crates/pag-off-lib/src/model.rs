//! Core data types for pag-off-lib.
//!
//! Same serde format as the tracker's ticket repositories, so a file
//! rewritten here diffs cleanly against what the tracker exported.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Keys the tracker writes that this client does not interpret.
///
/// Kept so that a rewrite never drops data.
pub type ExtraFields = BTreeMap<String, Value>;

/// A user snapshot embedded by value in tickets and comments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Person {
    /// Username on the tracker.
    pub name: String,

    /// Primary email address.
    #[serde(default)]
    pub default_email: String,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Person {
    #[must_use]
    pub fn new(name: impl Into<String>, default_email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_email: default_email.into(),
            extra: ExtraFields::new(),
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A comment on a ticket. Append-only from this client's point of view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Comment {
    /// Assigned by the tracker on sync; `None` for comments made offline.
    #[serde(default)]
    pub id: Option<i64>,

    /// Free text (markdown).
    pub comment: String,

    /// Epoch seconds, string-encoded.
    #[serde(default)]
    pub date_created: String,

    #[serde(default)]
    pub edited_on: Option<String>,

    #[serde(default)]
    pub editor: Option<Person>,

    #[serde(default)]
    pub parent: Option<i64>,

    /// Set for system-style metadata comments.
    #[serde(default)]
    pub notification: bool,

    pub user: Person,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Comment {
    /// Build a comment authored offline by `user`.
    #[must_use]
    pub fn new(user: &Person, text: impl Into<String>, date_created: impl Into<String>) -> Self {
        Self {
            id: None,
            comment: text.into(),
            date_created: date_created.into(),
            edited_on: None,
            editor: None,
            parent: None,
            notification: false,
            user: user.clone(),
            extra: ExtraFields::new(),
        }
    }

    /// Mark the comment as a metadata notification.
    #[must_use]
    pub fn notification(mut self) -> Self {
        self.notification = true;
        self
    }
}

/// A tracked ticket, one per file in the project directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Ticket {
    /// Assigned by the tracker; never generated locally.
    pub id: i64,

    pub title: String,

    #[serde(default)]
    pub content: String,

    /// Free-form but compared case-insensitively (`Open`, `Closed`, ...).
    pub status: String,

    /// Only meaningful once closed.
    #[serde(default)]
    pub close_status: Option<String>,

    #[serde(default)]
    pub priority: Option<i64>,

    #[serde(default)]
    pub milestone: Option<String>,

    #[serde(default)]
    pub private: bool,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub blocks: Vec<String>,

    #[serde(default)]
    pub depends: Vec<String>,

    #[serde(default)]
    pub date_created: String,

    #[serde(default)]
    pub last_updated: String,

    #[serde(default)]
    pub closed_at: Option<String>,

    /// Author.
    pub user: Person,

    #[serde(default)]
    pub assignee: Option<Person>,

    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Ticket {
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status.eq_ignore_ascii_case("closed")
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    #[must_use]
    pub fn assignee_name(&self) -> Option<&str> {
        self.assignee.as_ref().map(|p| p.name.as_str())
    }

    /// Whether `id` names this ticket, comparing textually so that `"7"`
    /// and `7` are the same ticket.
    #[must_use]
    pub fn id_matches(&self, id: &str) -> bool {
        self.id.to_string() == id.trim()
    }
}

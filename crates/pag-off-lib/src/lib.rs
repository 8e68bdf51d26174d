//! `pag-off-lib` - offline ticket store for pagure issue mirrors.
//!
//! A project's tickets live as one JSON file per ticket inside a git
//! checkout. This crate loads and filters them, and applies comment,
//! take and close as one confirmed file rewrite plus one commit each.
//!
//! # Quick Start
//!
//! ```no_run
//! use pag_off_lib::{Git, Mutator, Person, TicketFilters, TicketStore, filter_tickets};
//!
//! let store = TicketStore::open("tickets/my-project").unwrap();
//!
//! // Query
//! let open = filter_tickets(store.enumerate().unwrap(), &TicketFilters::default());
//!
//! // Mutate
//! let me = Person::new("alice", "alice@example.com");
//! let mutator = Mutator::new(&store, &Git, me);
//! let mut always = |_: &pag_off_lib::Ticket, _: &str| -> pag_off_lib::Result<bool> { Ok(true) };
//! mutator.comment("7", "Fixed upstream", &mut always).unwrap();
//! ```

pub mod error;
pub mod interrupt;
pub mod model;
pub mod mutation;
pub mod query;
pub mod store;
pub mod util;
pub mod vcs;

pub use error::{PagOffError, Result};
pub use interrupt::Interrupt;
pub use model::{Comment, Person, Ticket};
pub use mutation::{Confirm, Mutator, Outcome};
pub use query::{SortOrder, StatusFilter, TicketFilters, filter_tickets, parse_tags};
pub use store::{TicketFile, TicketStore};
pub use vcs::{Git, VersionControl};

//! Filter and sort types for ticket listings.

use std::fmt;
use std::str::FromStr;

use crate::error::PagOffError;
use crate::model::Ticket;

/// Which tickets a listing shows by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl StatusFilter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }

    #[must_use]
    pub fn matches(self, status: &str) -> bool {
        match self {
            Self::All => true,
            other => status.eq_ignore_ascii_case(other.as_str()),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = PagOffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "all" => Ok(Self::All),
            _ => Err(PagOffError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// Listing order, by ticket id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending id.
    Older,
    /// Descending id.
    #[default]
    Newer,
}

impl FromStr for SortOrder {
    type Err = PagOffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "older" => Ok(Self::Older),
            "newer" => Ok(Self::Newer),
            _ => Err(PagOffError::InvalidOrder {
                order: s.to_string(),
            }),
        }
    }
}

/// Filter options for listing tickets.
///
/// `None` and empty fields disable their predicate.
#[derive(Debug, Clone, Default)]
pub struct TicketFilters {
    pub status: StatusFilter,
    /// All listed tags must be present.
    pub tags: Vec<String>,
    /// Exact match on the assignee's name.
    pub assignee: Option<String>,
    /// Exact match on the author's name.
    pub author: Option<String>,
    pub milestone: Option<String>,
    pub order: SortOrder,
}

impl TicketFilters {
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if !self.status.matches(&ticket.status) {
            return false;
        }

        // Tag filtering (AND)
        if !self.tags.iter().all(|tag| ticket.has_tag(tag)) {
            return false;
        }

        if let Some(ref assignee) = self.assignee {
            if ticket.assignee_name() != Some(assignee.as_str()) {
                return false;
            }
        }

        if let Some(ref author) = self.author {
            if ticket.user.name != *author {
                return false;
            }
        }

        if let Some(ref milestone) = self.milestone {
            if ticket.milestone.as_deref() != Some(milestone.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Split a comma-separated tag list, dropping blanks.
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Apply `filters` and sort the survivors by id.
#[must_use]
pub fn filter_tickets(tickets: Vec<Ticket>, filters: &TicketFilters) -> Vec<Ticket> {
    let mut results: Vec<Ticket> = tickets
        .into_iter()
        .filter(|ticket| filters.matches(ticket))
        .collect();

    match filters.order {
        SortOrder::Older => results.sort_by_key(|t| t.id),
        SortOrder::Newer => results.sort_by(|a, b| b.id.cmp(&a.id)),
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Person;
    use proptest::prelude::*;

    fn make_ticket(id: i64, status: &str, tags: &[&str]) -> Ticket {
        Ticket {
            id,
            title: format!("Ticket {id}"),
            status: status.to_string(),
            tags: tags.iter().map(ToString::to_string).collect(),
            user: Person::new("bob", "bob@example.com"),
            ..Default::default()
        }
    }

    fn ids(tickets: &[Ticket]) -> Vec<i64> {
        tickets.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Open".parse::<StatusFilter>().unwrap(), StatusFilter::Open);
        assert_eq!("CLOSED".parse::<StatusFilter>().unwrap(), StatusFilter::Closed);
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert!(matches!(
            "pending".parse::<StatusFilter>(),
            Err(PagOffError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_order_parse() {
        assert_eq!("older".parse::<SortOrder>().unwrap(), SortOrder::Older);
        assert_eq!("Newer".parse::<SortOrder>().unwrap(), SortOrder::Newer);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("bug, ux ,,"), vec!["bug", "ux"]);
        assert!(parse_tags(" , ").is_empty());
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_open_bug_scenario() {
        let tickets = vec![make_ticket(7, "Open", &["bug"])];

        let filters = TicketFilters {
            status: StatusFilter::Open,
            tags: parse_tags("bug"),
            ..Default::default()
        };
        assert_eq!(ids(&filter_tickets(tickets.clone(), &filters)), vec![7]);

        let closed = TicketFilters {
            status: StatusFilter::Closed,
            ..Default::default()
        };
        assert!(filter_tickets(tickets, &closed).is_empty());
    }

    #[test]
    fn test_assignee_filter() {
        let mut mine = make_ticket(1, "Open", &[]);
        mine.assignee = Some(Person::new("alice", "alice@example.com"));
        let mut theirs = make_ticket(2, "Open", &[]);
        theirs.assignee = Some(Person::new("carol", "carol@example.com"));
        let nobody = make_ticket(3, "Open", &[]);

        let filters = TicketFilters {
            assignee: Some("alice".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ids(&filter_tickets(vec![mine, theirs, nobody], &filters)),
            vec![1]
        );
    }

    #[test]
    fn test_author_and_milestone_filters() {
        let mut a = make_ticket(1, "Open", &[]);
        a.milestone = Some("1.0".to_string());
        let mut b = make_ticket(2, "Open", &[]);
        b.user = Person::new("alice", "alice@example.com");
        b.milestone = Some("2.0".to_string());
        let c = make_ticket(3, "Open", &[]);
        let tickets = vec![a, b, c];

        let by_author = TicketFilters {
            author: Some("bob".to_string()),
            order: SortOrder::Older,
            ..Default::default()
        };
        assert_eq!(ids(&filter_tickets(tickets.clone(), &by_author)), vec![1, 3]);

        let by_milestone = TicketFilters {
            milestone: Some("1.0".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_tickets(tickets, &by_milestone)), vec![1]);
    }

    #[test]
    fn test_sort_orders() {
        let tickets = vec![
            make_ticket(5, "Open", &[]),
            make_ticket(1, "Open", &[]),
            make_ticket(12, "Open", &[]),
        ];
        let older = TicketFilters {
            order: SortOrder::Older,
            ..Default::default()
        };
        assert_eq!(ids(&filter_tickets(tickets.clone(), &older)), vec![1, 5, 12]);
        let newer = TicketFilters::default();
        assert_eq!(ids(&filter_tickets(tickets, &newer)), vec![12, 5, 1]);
    }

    proptest! {
        #[test]
        fn prop_tag_filter_is_subset(
            ticket_tags in proptest::collection::btree_set("[a-d]", 0..4),
            wanted in proptest::collection::btree_set("[a-d]", 0..4),
        ) {
            let tags: Vec<&str> = ticket_tags.iter().map(String::as_str).collect();
            let ticket = make_ticket(1, "Open", &tags);
            let input = wanted.iter().cloned().collect::<Vec<_>>().join(", ");
            let filters = TicketFilters {
                tags: parse_tags(&input),
                ..Default::default()
            };
            prop_assert_eq!(filters.matches(&ticket), wanted.is_subset(&ticket_tags));
        }

        #[test]
        fn prop_status_filter(status in "[oO][pP][eE][nN]|[cC][lL][oO][sS][eE][dD]") {
            let ticket = make_ticket(1, &status, &[]);
            let all = TicketFilters { status: StatusFilter::All, ..Default::default() };
            prop_assert!(all.matches(&ticket));

            let open = TicketFilters::default();
            prop_assert_eq!(open.matches(&ticket), status.eq_ignore_ascii_case("open"));
        }
    }
}

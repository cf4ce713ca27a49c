//! View state for the admin screens, independent of any UI toolkit.
//!
//! Front ends own one of these objects per screen, feed user input into it and render whatever
//! it exposes. Requests leave the state objects as plain values; their results are fed back in
//! together with the [`Ticket`] they were issued under.

mod delete;
mod edit;
mod list;
mod moderators;
mod table;

pub use delete::{DeleteModal, DeleteOutcome, DeleteRequest};
pub use edit::{CustomerDraft, EditModal, EditOutcome, Field, UpdateRequest};
pub use list::ListState;
pub use moderators::{EmptyState, ModeratorDirectory, ModeratorSummary, ModeratorView, filter_moderators};
pub use table::{CustomerTable, SortColumn, SortDirection, SortState};

/// Identifies one submission. A result is only applied when its ticket is still the one the
/// modal is waiting for, so results of abandoned submissions are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Default)]
struct Tickets {
    next: u64,
}

impl Tickets {
    fn issue(&mut self) -> Ticket {
        let ticket = Ticket(self.next);
        self.next = self.next.wrapping_add(1);
        ticket
    }
}

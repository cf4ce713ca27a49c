use crate::{
    data::QueryError,
    models::{Customer, RecordId},
    workflow::{Ticket, Tickets},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub ticket: Ticket,
    pub id: RecordId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The modal stays open, the failure has already been notified.
    Failed,
    Ignored,
}

#[derive(Debug, Clone)]
struct DeleteSession {
    target: Customer,
    pending: Option<Ticket>,
}

/// Delete confirmation of the customer table.
#[derive(Debug, Clone, Default)]
pub struct DeleteModal {
    session: Option<DeleteSession>,
    tickets: Tickets,
}

impl DeleteModal {
    pub fn open(&mut self, target: Customer) {
        self.session = Some(DeleteSession {
            target,
            pending: None,
        });
    }

    pub fn close(&mut self) {
        self.session = None;
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn target(&self) -> Option<&Customer> {
        self.session.as_ref().map(|s| &s.target)
    }

    pub fn is_deleting(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.pending.is_some())
    }

    /// The confirmation question, naming the target.
    pub fn prompt(&self) -> Option<String> {
        self.target().map(|target| {
            format!(
                "Are you sure you want to delete {}? This action cannot be undone.",
                target.display_name()
            )
        })
    }

    pub fn confirm_label(&self) -> &'static str {
        if self.is_deleting() {
            "Deleting..."
        } else {
            "Delete"
        }
    }

    /// Returns `None` when closed or when a delete is already running.
    pub fn confirm(&mut self) -> Option<DeleteRequest> {
        let session = self.session.as_mut()?;
        if session.pending.is_some() {
            return None;
        }

        let ticket = self.tickets.issue();
        session.pending = Some(ticket);

        Some(DeleteRequest {
            ticket,
            id: session.target.id.clone(),
        })
    }

    pub fn resolve(&mut self, ticket: Ticket, result: &Result<(), QueryError>) -> DeleteOutcome {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.pending == Some(ticket))
        else {
            return DeleteOutcome::Ignored;
        };

        match result {
            Ok(()) => {
                self.session = None;
                DeleteOutcome::Deleted
            }
            Err(_) => {
                session.pending = None;
                DeleteOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn grace() -> Customer {
        Customer::new(2, "Grace", "grace@example.com", "555-0102")
    }

    #[test]
    fn test_prompt_names_target() {
        let mut modal = DeleteModal::default();
        assert_eq!(modal.prompt(), None);

        modal.open(grace());

        assert!(modal.prompt().unwrap().contains("Grace"));
    }

    #[test]
    fn test_confirm_and_delete() {
        let mut modal = DeleteModal::default();
        modal.open(grace());

        let request = modal.confirm().unwrap();
        assert_eq!(request.id, RecordId::from(2));
        assert_eq!(modal.confirm_label(), "Deleting...");
        assert!(modal.confirm().is_none());

        assert_eq!(modal.resolve(request.ticket, &Ok(())), DeleteOutcome::Deleted);
        assert!(modal.target().is_none());
    }

    #[test]
    fn test_failure_keeps_modal_open() {
        let mut modal = DeleteModal::default();
        modal.open(grace());
        let request = modal.confirm().unwrap();

        let outcome = modal.resolve(request.ticket, &Err(QueryError::new("nope")));

        assert_eq!(outcome, DeleteOutcome::Failed);
        assert!(modal.is_open());
        assert!(!modal.is_deleting());
        assert_eq!(modal.confirm_label(), "Delete");
    }

    #[test]
    fn test_late_result_after_close_is_ignored() {
        let mut modal = DeleteModal::default();
        modal.open(grace());
        let request = modal.confirm().unwrap();
        modal.close();

        assert_eq!(modal.resolve(request.ticket, &Ok(())), DeleteOutcome::Ignored);
        assert!(!modal.is_open());
    }
}

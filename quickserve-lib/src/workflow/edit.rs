use strum::Display;

use crate::{
    api::FieldErrors,
    data::QueryError,
    models::{Customer, CustomerPatch, RecordId},
    workflow::{Ticket, Tickets},
};

/// Editable customer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Field {
    Name,
    Email,
    Phone,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Phone];

    /// Field name as used by the API in validation errors.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
        }
    }
}

/// Unsaved form values of the edit modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerDraft {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
        }
    }
}

impl From<&Customer> for CustomerDraft {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
        }
    }
}

impl From<CustomerDraft> for CustomerPatch {
    fn from(draft: CustomerDraft) -> Self {
        Self {
            name: Some(draft.name),
            email: Some(draft.email),
            phone: Some(draft.phone),
        }
    }
}

/// An update the front end should send through [`Customers::update`].
///
/// [`Customers::update`]: crate::data::Customers::update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub ticket: Ticket,
    pub id: RecordId,
    pub patch: CustomerPatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The update went through and the modal closed.
    Saved,
    /// The update failed; the modal stays open for another attempt.
    Rejected,
    /// The result belongs to a submission the modal no longer waits for.
    Ignored,
}

#[derive(Debug, Clone)]
struct EditSession {
    target: Customer,
    draft: CustomerDraft,
    errors: FieldErrors,
    pending: Option<Ticket>,
}

/// Edit modal of the customer table.
///
/// Closed, or open on exactly one target. Opening always seeds a fresh draft from the target
/// and clears previous field errors.
#[derive(Debug, Clone, Default)]
pub struct EditModal {
    session: Option<EditSession>,
    tickets: Tickets,
}

impl EditModal {
    pub fn open(&mut self, target: Customer) {
        self.session = Some(EditSession {
            draft: CustomerDraft::from(&target),
            target,
            errors: FieldErrors::new(),
            pending: None,
        });
    }

    /// Close without saving. An update already in flight still completes, but its result is
    /// ignored here.
    pub fn close(&mut self) {
        self.session = None;
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn target(&self) -> Option<&Customer> {
        self.session.as_ref().map(|s| &s.target)
    }

    pub fn draft(&self) -> Option<&CustomerDraft> {
        self.session.as_ref().map(|s| &s.draft)
    }

    /// First validation message for `field`, if the last submission was rejected with one.
    pub fn error(&self, field: Field) -> Option<&str> {
        self.session.as_ref()?.errors.first(field.key())
    }

    pub fn is_submitting(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.pending.is_some())
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "Saving..."
        } else {
            "Save changes"
        }
    }

    pub fn set_field(&mut self, field: Field, value: String) {
        if let Some(session) = &mut self.session {
            session.draft.set(field, value);
        }
    }

    /// Start saving the draft. Returns `None` when closed or when a save is already running.
    pub fn submit(&mut self) -> Option<UpdateRequest> {
        let session = self.session.as_mut()?;
        if session.pending.is_some() {
            return None;
        }

        let ticket = self.tickets.issue();
        session.pending = Some(ticket);

        Some(UpdateRequest {
            ticket,
            id: session.target.id.clone(),
            patch: session.draft.clone().into(),
        })
    }

    /// Apply the result of the update issued under `ticket`.
    pub fn resolve(&mut self, ticket: Ticket, result: &Result<(), QueryError>) -> EditOutcome {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.pending == Some(ticket))
        else {
            return EditOutcome::Ignored;
        };

        match result {
            Ok(()) => {
                self.session = None;
                EditOutcome::Saved
            }
            Err(err) => {
                session.pending = None;
                // Without structured errors the notification is all the operator gets
                session.errors = err.field_errors.clone();
                EditOutcome::Rejected
            }
        }
    }
}

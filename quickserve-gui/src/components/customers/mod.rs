use iced::{
    Element, Length, Task,
    widget::{button, column, row, scrollable, space, table, text},
};
use quickserve_lib::{
    data::{Customers, QueryError},
    models::Customer,
    workflow::{
        CustomerTable, DeleteRequest, ListState, SortColumn, SortDirection, SortState, Ticket,
        UpdateRequest,
    },
};

use crate::{
    config::{self, Cfg},
    modal,
};

pub mod delete_dialog;
pub mod edit_dialog;

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<Vec<Customer>, QueryError>),
    SortChanged(SortColumn),
    EditPressed(Customer),
    DeletePressed(Customer),
    Updated(Ticket, Result<(), QueryError>),
    Deleted(Ticket, Result<(), QueryError>),
    // Components
    EditDialog(edit_dialog::Message),
    DeleteDialog(delete_dialog::Message),
}

pub enum Action {
    None,
    Run(Task<Message>),
    /// A customer was changed on the server, every view of the customer list is now outdated.
    Changed,
}

pub struct CustomersPage {
    customers: Customers,
    cfg: Cfg,
    state: ListState<Customer>,
    table: CustomerTable,
}

impl CustomersPage {
    pub fn new(customers: Customers, cfg: Cfg) -> (Self, Task<Message>) {
        let sort = cfg.read().customer_table.sort_state;
        let task = load(&customers);

        (
            Self {
                customers,
                cfg,
                state: ListState::Loading,
                table: CustomerTable::new(sort),
            },
            task,
        )
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::Loaded(result) => {
                self.state = result.into();
                Action::None
            }
            Message::SortChanged(column) => {
                self.table.sort_by(column);
                self.cfg.write().customer_table.sort_state = self.table.sort;
                config::persist(&self.cfg);
                Action::None
            }
            Message::EditPressed(customer) => {
                self.table.edit(customer);
                Action::None
            }
            Message::DeletePressed(customer) => {
                self.table.confirm_delete(customer);
                Action::None
            }
            Message::EditDialog(message) => {
                match edit_dialog::update(&mut self.table.edit, message) {
                    edit_dialog::Action::None => Action::None,
                    edit_dialog::Action::Cancel => {
                        self.table.edit.close();
                        Action::None
                    }
                    edit_dialog::Action::Submit(request) => {
                        Action::Run(update_customer(&self.customers, request))
                    }
                }
            }
            Message::DeleteDialog(message) => {
                match delete_dialog::update(&mut self.table.delete, message) {
                    delete_dialog::Action::None => Action::None,
                    delete_dialog::Action::Cancel => {
                        self.table.delete.close();
                        Action::None
                    }
                    delete_dialog::Action::Confirm(request) => {
                        Action::Run(delete_customer(&self.customers, request))
                    }
                }
            }
            // The modal may have been closed meanwhile, the server-side change happened anyway
            Message::Updated(ticket, result) => {
                self.table.edit.resolve(ticket, &result);
                changed_if_ok(&result)
            }
            Message::Deleted(ticket, result) => {
                self.table.delete.resolve(ticket, &result);
                changed_if_ok(&result)
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.state {
            ListState::Loading => column![text("Loading customers...")].into(),
            ListState::Error(e) => column![text(e).style(text::danger)].into(),
            ListState::Loaded(customers) if customers.is_empty() => {
                column![text("No customers yet.")].into()
            }
            ListState::Loaded(customers) => {
                let columns = [
                    table::column(
                        column_header("Name", &self.table.sort, SortColumn::Name),
                        |customer: Customer| text(customer.display_name()),
                    ),
                    table::column(
                        column_header("Email", &self.table.sort, SortColumn::Email),
                        |customer: Customer| text(customer.email),
                    ),
                    table::column(text("Phone"), |customer: Customer| text(customer.phone)),
                    table::column(text("Role"), |customer: Customer| {
                        text(customer.role.map(|r| r.to_string()).unwrap_or_default())
                    }),
                    table::column(text("Actions"), |customer: Customer| {
                        row![
                            button("Edit")
                                .style(button::subtle)
                                .on_press(Message::EditPressed(customer.clone())),
                            button("Delete")
                                .style(button::danger)
                                .on_press(Message::DeletePressed(customer)),
                        ]
                        .spacing(4)
                    }),
                ];

                column![scrollable(
                    table(columns, self.table.rows(customers)).width(Length::Fill)
                )]
                .into()
            }
        };

        if self.table.edit.is_open() {
            modal(
                content,
                edit_dialog::view(&self.table.edit).map(Message::EditDialog),
                Message::EditDialog(edit_dialog::Message::CancelPressed),
            )
        } else if self.table.delete.is_open() {
            modal(
                content,
                delete_dialog::view(&self.table.delete).map(Message::DeleteDialog),
                Message::DeleteDialog(delete_dialog::Message::CancelPressed),
            )
        } else {
            content
        }
    }

    pub fn refresh(&self) -> Task<Message> {
        load(&self.customers)
    }
}

fn changed_if_ok(result: &Result<(), QueryError>) -> Action {
    if result.is_ok() {
        Action::Changed
    } else {
        Action::None
    }
}

fn load(customers: &Customers) -> Task<Message> {
    let customers = customers.clone();
    Task::perform(async move { customers.get_all().await }, Message::Loaded)
}

fn update_customer(customers: &Customers, request: UpdateRequest) -> Task<Message> {
    let customers = customers.clone();
    let UpdateRequest { ticket, id, patch } = request;

    Task::perform(
        async move { customers.update(&id, &patch).await },
        move |result| Message::Updated(ticket, result),
    )
}

fn delete_customer(customers: &Customers, request: DeleteRequest) -> Task<Message> {
    let customers = customers.clone();
    let DeleteRequest { ticket, id } = request;

    Task::perform(
        async move { customers.delete(&id).await },
        move |result| Message::Deleted(ticket, result),
    )
}

fn column_header<'a>(
    name: &'a str,
    sort_state: &'a SortState,
    column: SortColumn,
) -> Element<'a, Message> {
    let indicator = match sort_state.direction_of(column) {
        Some(SortDirection::Ascending) => "▲",
        Some(SortDirection::Descending) => "▼",
        None => "",
    };

    button(row![text(name), space::horizontal(), text(indicator)])
        .style(button::subtle)
        .width(Length::Fill)
        .on_press(Message::SortChanged(column))
        .into()
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use parking_lot::RwLock;
    use quickserve_lib::{
        cache::QueryOptions,
        demo,
        workflow::{DeleteModal, EditModal},
    };

    use super::*;
    use crate::config::GuiConfig;

    fn page() -> CustomersPage {
        let client = demo::client(QueryOptions::default());
        let cfg = Arc::new(RwLock::new(GuiConfig::default()));

        CustomersPage::new(client.customers().clone(), cfg).0
    }

    fn customer() -> Customer {
        demo::customers().into_iter().next().unwrap()
    }

    #[test]
    fn test_update_after_cancel_still_reloads() {
        let mut page = page();
        page.update(Message::EditPressed(customer()));

        // A submission whose modal was cancelled before the server answered
        let mut abandoned = EditModal::default();
        abandoned.open(customer());
        let ticket = abandoned.submit().unwrap().ticket;
        page.update(Message::EditDialog(edit_dialog::Message::CancelPressed));

        let action = page.update(Message::Updated(ticket, Ok(())));

        assert!(matches!(action, Action::Changed));
        assert!(!page.table.edit.is_open());
    }

    #[test]
    fn test_delete_after_cancel_still_reloads() {
        let mut page = page();

        let mut abandoned = DeleteModal::default();
        abandoned.open(customer());
        let ticket = abandoned.confirm().unwrap().ticket;

        let action = page.update(Message::Deleted(ticket, Ok(())));

        assert!(matches!(action, Action::Changed));
    }

    #[test]
    fn test_failed_update_does_not_reload() {
        let mut page = page();
        page.update(Message::EditPressed(customer()));

        let mut other = EditModal::default();
        other.open(customer());
        let ticket = other.submit().unwrap().ticket;

        let action = page.update(Message::Updated(ticket, Err(QueryError::new("boom"))));

        assert!(matches!(action, Action::None));
        assert!(page.table.edit.is_open());
    }
}

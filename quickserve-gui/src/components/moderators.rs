use iced::{
    Element, Length, Task,
    widget::{column, container, row, scrollable, table, text, text_input},
};
use quickserve_lib::{
    data::{Customers, QueryError},
    models::Customer,
    workflow::{ListState, ModeratorDirectory, ModeratorSummary},
};

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<Vec<Customer>, QueryError>),
    SearchInput(String),
}

/// Moderators are users with the moderator role, read from the same customer query.
pub struct ModeratorsPage {
    customers: Customers,
    state: ListState<Customer>,
    directory: ModeratorDirectory,
}

impl ModeratorsPage {
    pub fn new(customers: Customers) -> (Self, Task<Message>) {
        let task = load(&customers);

        (
            Self {
                customers,
                state: ListState::Loading,
                directory: ModeratorDirectory::default(),
            },
            task,
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(result) => {
                if let Ok(users) = &result {
                    self.directory.set_users(users.clone());
                }
                self.state = result.into();
            }
            Message::SearchInput(search) => self.directory.set_search(search),
        }

        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        match &self.state {
            ListState::Loading => column![text("Loading moderators...")].into(),
            ListState::Error(e) => column![text(e).style(text::danger)].into(),
            ListState::Loaded(_) => {
                let view = self.directory.view();

                let list: Element<'_, Message> = match view.empty {
                    Some(empty) => text(empty.message()).into(),
                    None => {
                        let columns = [
                            table::column(text("Name"), |m: Customer| text(m.display_name())),
                            table::column(text("Email"), |m: Customer| text(m.email)),
                            table::column(text("Phone"), |m: Customer| text(m.phone)),
                            table::column(text("Status"), |m: Customer| {
                                if m.is_active() {
                                    text("Active").style(text::success)
                                } else {
                                    text("Inactive").style(text::danger)
                                }
                            }),
                        ];

                        scrollable(table(columns, view.moderators.clone()).width(Length::Fill))
                            .into()
                    }
                };

                column![
                    text_input("Search moderators...", self.directory.search())
                        .on_input(Message::SearchInput),
                    summary(&view.summary),
                    list,
                ]
                .spacing(12)
                .into()
            }
        }
    }

    pub fn refresh(&self) -> Task<Message> {
        load(&self.customers)
    }
}

fn summary(summary: &ModeratorSummary) -> Element<'_, Message> {
    let card = |label: &'static str, count: usize| {
        container(column![text(label).size(12), text(count.to_string()).size(20)])
            .style(container::bordered_box)
            .padding(10)
            .width(Length::Fill)
    };

    row![
        card("Total", summary.total),
        card("Active", summary.active),
        card("Inactive", summary.inactive),
    ]
    .spacing(8)
    .into()
}

fn load(customers: &Customers) -> Task<Message> {
    let customers = customers.clone();
    Task::perform(async move { customers.get_all().await }, Message::Loaded)
}

use std::sync::Arc;

use iced::{
    Color, Element,
    Length::Fill,
    Task, Theme, application,
    widget::{
        Column, button, center, column, container, mouse_area, opaque, pick_list, row, space,
        stack, text,
    },
};
use parking_lot::RwLock;
use quickserve_lib::{
    Client,
    config::CoreConfig,
    demo,
    notify::{Level, Notification},
};
use strum::VariantArray;
use tracing::{Level as LogLevel, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    components::{
        customers::{self, CustomersPage},
        moderators::{self, ModeratorsPage},
    },
    config::{Cfg, GuiConfig},
};

pub mod components;
pub mod config;

/// Set to run against the built-in sample data instead of a server.
const DEMO_ENV: &str = "QUICKSERVE_DEMO";

fn main() -> iced::Result {
    application(App::new, App::update, App::view)
        .theme(App::theme)
        .title(App::title)
        .run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Customers,
    Moderators,
}

#[derive(Debug, Clone)]
enum Message {
    TabSelected(Tab),
    ThemeSelected(config::Theme),
    NotificationsDismissed,
    // Components
    Customers(customers::Message),
    Moderators(moderators::Message),
}

struct App {
    title: String,
    cfg: Cfg,
    client: Client,
    tab: Tab,
    notifications: Vec<Notification>,
    // Components
    customers: CustomersPage,
    moderators: ModeratorsPage,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        // Human friendly panicking in release mode
        human_panic::setup_panic!();

        // Logging
        let subscriber = FmtSubscriber::builder()
            .with_max_level(LogLevel::TRACE)
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Could not set up logging: {err}");
        }

        let cfg = Arc::new(RwLock::new(GuiConfig::load()));
        let (client, startup_error) = connect();

        let (customers, customers_task) =
            CustomersPage::new(client.customers().clone(), cfg.clone());
        let (moderators, moderators_task) = ModeratorsPage::new(client.customers().clone());

        let mut notifications = Vec::new();
        if let Some(message) = startup_error {
            notifications.push(Notification {
                level: Level::Error,
                message,
            });
        }

        (
            Self {
                title: "quickServe Admin".into(),
                cfg,
                client,
                tab: Tab::Customers,
                notifications,
                customers,
                moderators,
            },
            Task::batch([
                customers_task.map(Message::Customers),
                moderators_task.map(Message::Moderators),
            ]),
        )
    }

    // Update application state based on messages passed by view()
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
                Task::none()
            }
            Message::ThemeSelected(theme) => {
                self.cfg.write().theme = theme;
                config::persist(&self.cfg);
                Task::none()
            }
            Message::NotificationsDismissed => {
                self.notifications.clear();
                Task::none()
            }
            Message::Customers(message) => match self.customers.update(message) {
                customers::Action::None => Task::none(),
                customers::Action::Run(task) => task.map(Message::Customers),
                // Both tabs read the invalidated customer query
                customers::Action::Changed => Task::batch([
                    self.customers.refresh().map(Message::Customers),
                    self.moderators.refresh().map(Message::Moderators),
                ]),
            },
            Message::Moderators(message) => {
                self.moderators.update(message).map(Message::Moderators)
            }
        };

        self.notifications.extend(self.client.notifications().drain());

        task
    }

    // Render the application and pass along messages from components to update()
    pub fn view(&self) -> Element<'_, Message> {
        let page = match self.tab {
            Tab::Customers => self.customers.view().map(Message::Customers),
            Tab::Moderators => self.moderators.view().map(Message::Moderators),
        };

        column![
            // Top bar
            row![
                tab_button("Customers", Tab::Customers, self.tab),
                tab_button("Moderators", Tab::Moderators, self.tab),
                space::horizontal(),
                pick_list(
                    config::Theme::VARIANTS,
                    Some(self.cfg.read().theme),
                    Message::ThemeSelected
                ),
            ]
            .spacing(8),
            container(page).height(Fill),
            self.notification_strip(),
        ]
        .spacing(12)
        .padding(12)
        .height(Fill)
        .into()
    }

    fn notification_strip(&self) -> Element<'_, Message> {
        if self.notifications.is_empty() {
            return space::vertical().height(0).into();
        }

        let messages = Column::with_children(self.notifications.iter().map(|notification| {
            let style = match notification.level {
                Level::Success => text::success,
                Level::Error => text::danger,
            };
            text(&notification.message).style(style).into()
        }));

        container(row![
            messages,
            space::horizontal(),
            button("Dismiss")
                .style(button::subtle)
                .on_press(Message::NotificationsDismissed),
        ])
        .style(container::bordered_box)
        .padding(8)
        .width(Fill)
        .into()
    }

    pub fn title(&self) -> String {
        self.title.clone()
    }

    pub fn theme(&self) -> Theme {
        self.cfg.read().theme()
    }
}

/// Build the client. When the configured server can't be used the sample data is shown instead,
/// together with the reason.
fn connect() -> (Client, Option<String>) {
    let core = match CoreConfig::load() {
        Ok(core) => core,
        Err(err) => {
            error!(%err, "Could not load core configuration");
            return (
                demo::client(Default::default()),
                Some(format!("{err}. Showing sample data.")),
            );
        }
    };

    if std::env::var_os(DEMO_ENV).is_some() {
        info!("Running with sample data");
        return (demo::client(core.query), None);
    }

    match Client::new(&core) {
        Ok(client) => (client, None),
        Err(err) => {
            error!(%err, api_url = %core.api_url, "Could not create API client");
            (
                demo::client(core.query),
                Some(format!(
                    "Could not connect to {}: {err}. Showing sample data.",
                    core.api_url
                )),
            )
        }
    }
}

fn tab_button(label: &str, tab: Tab, selected: Tab) -> Element<'_, Message> {
    button(text(label))
        .style(if tab == selected {
            button::primary
        } else {
            button::subtle
        })
        .on_press(Message::TabSelected(tab))
        .into()
}

/// Show `dialog` centered over a dimmed `base`. Pressing anywhere on the dimmed area sends
/// `on_dismiss`.
pub fn modal<'a, Message: Clone + 'a>(
    base: impl Into<Element<'a, Message>>,
    dialog: impl Into<Element<'a, Message>>,
    on_dismiss: Message,
) -> Element<'a, Message> {
    let backdrop = mouse_area(center(opaque(dialog)).style(dimmed)).on_press(on_dismiss);

    stack![base.into(), opaque(backdrop)]
        .width(Fill)
        .height(Fill)
        .into()
}

fn dimmed(_theme: &Theme) -> container::Style {
    container::Style::default().background(Color::BLACK.scale_alpha(0.7))
}

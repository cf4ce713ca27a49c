use iced::{
    Element,
    widget::{button, column, container, row, space, text},
};
use quickserve_lib::workflow::{DeleteModal, DeleteRequest};

#[derive(Debug, Clone)]
pub enum Message {
    CancelPressed,
    ConfirmPressed,
}

pub enum Action {
    None,
    Cancel,
    Confirm(DeleteRequest),
}

pub fn update(modal: &mut DeleteModal, message: Message) -> Action {
    match message {
        Message::CancelPressed => Action::Cancel,
        Message::ConfirmPressed => match modal.confirm() {
            Some(request) => Action::Confirm(request),
            None => Action::None,
        },
    }
}

pub fn view(modal: &DeleteModal) -> Element<'_, Message> {
    let deleting = modal.is_deleting();

    container(column![
        text("Delete customer").size(20),
        text(modal.prompt().unwrap_or_default()),
        row![
            space::horizontal(),
            button("Cancel")
                .style(button::secondary)
                .on_press(Message::CancelPressed),
            button(text(modal.confirm_label()))
                .style(button::danger)
                .on_press_maybe((!deleting).then_some(Message::ConfirmPressed)),
        ]
        .spacing(8),
    ]
    .spacing(16))
    .style(container::rounded_box)
    .padding(20)
    .width(420)
    .into()
}

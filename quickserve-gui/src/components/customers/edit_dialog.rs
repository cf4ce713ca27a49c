use iced::{
    Element,
    widget::{Column, button, column, container, row, space, text, text_input},
};
use quickserve_lib::workflow::{EditModal, Field, UpdateRequest};

#[derive(Debug, Clone)]
pub enum Message {
    Input(Field, String),
    CancelPressed,
    SavePressed,
}

pub enum Action {
    None,
    Cancel,
    Submit(UpdateRequest),
}

pub fn update(modal: &mut EditModal, message: Message) -> Action {
    match message {
        Message::Input(field, value) => {
            modal.set_field(field, value);
            Action::None
        }
        Message::CancelPressed => Action::Cancel,
        Message::SavePressed => match modal.submit() {
            Some(request) => Action::Submit(request),
            None => Action::None,
        },
    }
}

pub fn view(modal: &EditModal) -> Element<'_, Message> {
    let Some(draft) = modal.draft() else {
        return space::vertical().into();
    };
    let submitting = modal.is_submitting();

    let fields = Column::with_children(Field::ALL.into_iter().map(|field| {
        let input = text_input("...", draft.get(field)).on_input_maybe(
            (!submitting).then_some(move |value: String| Message::Input(field, value)),
        );

        let mut entry = column![text(field.to_string()), input].spacing(4);
        if let Some(error) = modal.error(field) {
            entry = entry.push(text(error).size(12).style(text::danger));
        }
        entry.into()
    }))
    .spacing(12);

    container(column![
        text("Edit customer").size(20),
        fields,
        space::vertical(),
        row![
            space::horizontal(),
            button("Cancel")
                .style(button::secondary)
                .on_press(Message::CancelPressed),
            button(text(modal.submit_label()))
                .style(button::primary)
                .on_press_maybe((!submitting).then_some(Message::SavePressed)),
        ]
        .spacing(8),
    ]
    .spacing(16))
    .style(container::rounded_box)
    .padding(20)
    .width(420)
    .height(420)
    .into()
}

use serde::{Deserialize, Serialize};
use strum::{Display, VariantArray};

/// Themes selectable from the top bar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, VariantArray)]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Dracula,
    Nord,
    #[strum(to_string = "Solarized Light")]
    SolarizedLight,
    #[strum(to_string = "Solarized Dark")]
    SolarizedDark,
    #[strum(to_string = "Tokyo Night")]
    TokyoNight,
}

impl From<&Theme> for iced::Theme {
    fn from(theme: &Theme) -> Self {
        match theme {
            Theme::Light => iced::Theme::Light,
            Theme::Dark => iced::Theme::Dark,
            Theme::Dracula => iced::Theme::Dracula,
            Theme::Nord => iced::Theme::Nord,
            Theme::SolarizedLight => iced::Theme::SolarizedLight,
            Theme::SolarizedDark => iced::Theme::SolarizedDark,
            Theme::TokyoNight => iced::Theme::TokyoNight,
        }
    }
}

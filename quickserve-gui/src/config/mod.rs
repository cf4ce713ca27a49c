use std::{fs, path::PathBuf, sync::Arc};

use parking_lot::RwLock;
use quickserve_lib::{config::ConfigError, fs::config_dir, workflow::SortState};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use theme::Theme;

mod theme;

const FILE_NAME: &str = "gui.toml";

/// Handle to the GUI configuration, shared between components
pub type Cfg = Arc<RwLock<GuiConfig>>;

/// The GUI's configuration, serialized to TOML.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub theme: Theme,
    pub customer_table: CustomerTable,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerTable {
    pub sort_state: SortState,
}

impl GuiConfig {
    /// Load the stored configuration. Any problem reading it is logged and the defaults are used
    /// instead, the GUI never refuses to start over its own settings.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(%err, "Could not load GUI configuration, using defaults");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self, ConfigError> {
        let path = path()?;

        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let cfg = Self::default();
            cfg.save()?;
            Ok(cfg)
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path()?, contents)?;

        Ok(())
    }

    pub fn theme(&self) -> iced::Theme {
        (&self.theme).into()
    }
}

fn path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(FILE_NAME))
}

/// Persist `cfg`, logging instead of failing.
pub fn persist(cfg: &Cfg) {
    if let Err(err) = cfg.read().save() {
        warn!(%err, "Could not save GUI configuration");
    }
}

#[cfg(test)]
mod test {
    use quickserve_lib::workflow::{SortColumn, SortDirection};

    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let cfg: GuiConfig = toml::from_str("theme = \"Nord\"").unwrap();

        assert_eq!(cfg.theme, Theme::Nord);
        assert_eq!(cfg.customer_table, CustomerTable::default());
    }

    #[test]
    fn test_sort_state_survives_save() {
        let mut cfg = GuiConfig::default();
        cfg.customer_table.sort_state = SortState::default().toggle(SortColumn::Email);

        let contents = toml::to_string_pretty(&cfg).unwrap();
        let loaded: GuiConfig = toml::from_str(&contents).unwrap();

        assert_eq!(
            loaded.customer_table.sort_state.direction_of(SortColumn::Email),
            Some(SortDirection::Ascending)
        );
    }
}

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::registry::CountyRegistry;
use crate::error::ConfigError;

/// File looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "dashboard.toml";

const DEFAULT_TITLE: &str = "County Coverage Dashboard";

// ---------------------------------------------------------------------------
// Dashboard configuration (`dashboard.toml`)
// ---------------------------------------------------------------------------

/// Optional deployment settings. Every key may be omitted.
///
/// ```toml
/// title = "KNCCI Mobilization Summary"
/// counties = ["Nairobi", "Kisumu", "Mombasa"]
/// data_file = "sessions.csv"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Window and page title.
    pub title: Option<String>,
    /// Replaces the built-in list of Kenyan counties.
    pub counties: Option<Vec<String>>,
    /// Loaded at start-up when no file is given on the command line.
    pub data_file: Option<PathBuf>,
}

impl DashboardConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No {} found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// The county registry this deployment reports against.
    pub fn registry(&self) -> CountyRegistry {
        match &self.counties {
            Some(list) if !list.is_empty() => CountyRegistry::new(list),
            _ => CountyRegistry::kenya(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = DashboardConfig::from_toml("").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.title(), DEFAULT_TITLE);
        assert_eq!(cfg.registry().len(), 47);
    }

    #[test]
    fn counties_override_registry() {
        let cfg = DashboardConfig::from_toml(
            r#"
            title = "Pilot"
            counties = ["Nairobi", "Kisumu"]
            data_file = "sessions.csv"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.title(), "Pilot");
        assert_eq!(cfg.registry(), CountyRegistry::new(["Kisumu", "Nairobi"]));
        assert_eq!(cfg.data_file, Some(PathBuf::from("sessions.csv")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(DashboardConfig::from_toml("colour = \"red\"").is_err());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DashboardConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }
}

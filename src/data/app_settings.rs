use crate::data::persistence::Persistable;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// Where the miqaat store lives: a JSON file path (relative paths
    /// resolve against the data directory) or an http(s) URL.
    pub source: String,
    /// Render Hijri day numbers with Arabic-Indic digits.
    pub arabic_numerals: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            source: "miqaats.json".to_string(),
            arabic_numerals: true,
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml, leaving room for
/// sibling top-level keys — serde ignores unknown fields by default.
#[derive(Serialize, Deserialize, Default, Debug)]
pub(crate) struct SettingsFile {
    #[serde(default)]
    pub(crate) settings: AppSettings,
}

impl Persistable for SettingsFile {
    fn filename() -> &'static str {
        "config.yaml"
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsFile::load()?.settings)
    }

    pub fn save(&self) -> Result<()> {
        let file = SettingsFile {
            settings: self.clone(),
        };
        file.save()
    }
}

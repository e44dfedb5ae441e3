use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ASSISTANT_NAME: &str = "Nova My AI Shopping Assistant";
const ASSISTANT_SUFFIX: &str = "My AI Shopping Assistant";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Client-side display preferences. Passed around explicitly and persisted only when
/// the owner calls [`AssistantPreferences::save`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantPreferences {
    pub assistant_name: String,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for AssistantPreferences {
    fn default() -> Self {
        Self {
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            theme: Theme::default(),
        }
    }
}

impl AssistantPreferences {
    pub fn with_name(input: &str) -> Self {
        Self {
            assistant_name: normalize_assistant_name(input),
            ..Self::default()
        }
    }

    /// Missing file means defaults; an unreadable or corrupt file is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read preferences at {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid preferences JSON at {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self).context("failed to serialize preferences")?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write preferences to {}", path.display()))
    }
}

/// `"Ada"` -> `"Ada My AI Shopping Assistant"`; blank input gets the default name.
pub fn normalize_assistant_name(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return DEFAULT_ASSISTANT_NAME.to_string();
    }
    if trimmed
        .to_lowercase()
        .ends_with(&ASSISTANT_SUFFIX.to_lowercase())
    {
        return trimmed.to_string();
    }
    format!("{trimmed} {ASSISTANT_SUFFIX}")
}

use serde_json::Value;
use std::path::PathBuf;

use crate::error::ConfigError;

// =============================================================================
// Settings defaults
// =============================================================================

/// Default cap on diagnostics published per document
pub const DEFAULT_MAX_NUMBER_OF_PROBLEMS: usize = 100;

/// Default for clearing a document's diagnostics when it is closed
pub const DEFAULT_CLEAR_PROBLEMS_ON_DOCUMENT_CLOSE: bool = false;

/// Configuration section the client synchronizes to the server
pub const DEFAULT_SETTINGS_SECTION: &str = "cssLanguageClient";

const MAX_NUMBER_OF_PROBLEMS_KEY: &str = "maxNumberOfProblems";
const CLEAR_PROBLEMS_ON_DOCUMENT_CLOSE_KEY: &str = "clearProblemsOnDocumentClose";

/// Server settings, replaced as a whole on every configuration change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub max_number_of_problems: usize,
    pub clear_problems_on_document_close: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_number_of_problems: DEFAULT_MAX_NUMBER_OF_PROBLEMS,
            clear_problems_on_document_close: DEFAULT_CLEAR_PROBLEMS_ON_DOCUMENT_CLOSE,
        }
    }
}

impl Settings {
    /// Build settings from a settings section using the default-substitution table:
    ///
    /// | field                          | falsy / missing / malformed | invalid  |
    /// |--------------------------------|-----------------------------|----------|
    /// | `maxNumberOfProblems`          | 100                         | negative |
    /// | `clearProblemsOnDocumentClose` | false                       | -        |
    pub fn from_section(section: &Value) -> Result<Self, ConfigError> {
        Ok(Self {
            max_number_of_problems: extract_max_number_of_problems(
                section.get(MAX_NUMBER_OF_PROBLEMS_KEY),
            )?,
            clear_problems_on_document_close: extract_clear_on_close(
                section.get(CLEAR_PROBLEMS_ON_DOCUMENT_CLOSE_KEY),
            ),
        })
    }
}

fn extract_max_number_of_problems(value: Option<&Value>) -> Result<usize, ConfigError> {
    let Some(Value::Number(number)) = value else {
        return Ok(DEFAULT_MAX_NUMBER_OF_PROBLEMS);
    };

    // Checked before truncation so that values in (-1, 0) are not read as 0
    if number.as_f64().is_some_and(|f| f < 0.0) {
        return Err(ConfigError::InvalidConfiguration(format!(
            "{MAX_NUMBER_OF_PROBLEMS_KEY} must not be negative, got {number}"
        )));
    }

    let truncated = match number.as_u64() {
        Some(n) => n,
        None => number.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0) as u64,
    };

    match truncated {
        0 => Ok(DEFAULT_MAX_NUMBER_OF_PROBLEMS),
        n => Ok(usize::try_from(n).unwrap_or(usize::MAX)),
    }
}

/// Only a JSON `true` enables clearing; truthy non-booleans such as `1` or `"yes"` give false.
fn extract_clear_on_close(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_bool)
        .unwrap_or(DEFAULT_CLEAR_PROBLEMS_ON_DOCUMENT_CLOSE)
}

/// Process-wide settings state owned by the event router
#[derive(Debug, Clone)]
pub struct SettingsState {
    section: String,
    current: Settings,
}

impl SettingsState {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            current: Settings::default(),
        }
    }

    /// Apply a `workspace/didChangeConfiguration` payload.
    ///
    /// Reads the configured section; when it is absent but the payload itself
    /// carries one of the known keys, the payload is read as the section.
    /// On error the previous settings stay in effect.
    pub fn update(&mut self, raw: &Value) -> Result<Settings, ConfigError> {
        let section = raw
            .get(&self.section)
            .or_else(|| is_bare_section(raw).then_some(raw));

        self.current = match section {
            Some(section) => Settings::from_section(section)?,
            None => Settings::default(),
        };
        Ok(self.current)
    }

    pub fn current(&self) -> Settings {
        self.current
    }
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_SECTION)
    }
}

fn is_bare_section(raw: &Value) -> bool {
    raw.get(MAX_NUMBER_OF_PROBLEMS_KEY).is_some()
        || raw.get(CLEAR_PROBLEMS_ON_DOCUMENT_CLOSE_KEY).is_some()
}

// =============================================================================
// Paths
// =============================================================================

/// Returns the path to the data directory for csslint-lsp.
/// Uses $XDG_DATA_HOME/csslint-lsp if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/csslint-lsp,
/// or ./csslint-lsp if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Name of the log file written under [`data_dir`]
pub const LOG_FILE_NAME: &str = "csslint-lsp.log";

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("csslint-lsp")
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use quick_links::api::client::DEFAULT_BASE_URL;
use quick_links::completion::source::{DEFAULT_DEBOUNCE, DEFAULT_QUERY_TIMEOUT};
use quick_links::host::LinkSettings;
use quick_links::{QuickLinksError, Result};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub joplin: JoplinConfig,
    #[serde(default)]
    pub links: LinkSettings,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JoplinConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CompletionConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    #[serde(default = "default_folder_refresh_secs")]
    pub folder_refresh_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            query_timeout_ms: default_query_timeout_ms(),
            folder_refresh_secs: default_folder_refresh_secs(),
        }
    }
}

impl CompletionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn folder_refresh(&self) -> Duration {
        Duration::from_secs(self.folder_refresh_secs.max(1))
    }
}

/// How the editor addresses positions when applying completions.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    #[default]
    Offsets,
    Lines,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct EditorConfig {
    #[serde(default)]
    pub positions: PositionMode,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Defaults to `quick-links.log` next to the config file.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_query_timeout_ms() -> u64 {
    DEFAULT_QUERY_TIMEOUT.as_millis() as u64
}

fn default_folder_refresh_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".into()
}

impl AppConfig {
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::defaults()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("QUICK_LINKS_").split("__"))
            .extract()
            .map_err(|e| QuickLinksError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.joplin.url.trim().is_empty() {
            return Err(QuickLinksError::Config("joplin.url is required".into()));
        }
        if self.joplin.token.is_empty() {
            return Err(QuickLinksError::Config(
                "joplin.token is required (set in config or QUICK_LINKS_JOPLIN__TOKEN env var)"
                    .into(),
            ));
        }
        Ok(())
    }

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(|xdg| PathBuf::from(xdg).join("quick-links"))
            .or_else(|| {
                directories::BaseDirs::new()
                    .map(|dirs| dirs.home_dir().join(".config").join("quick-links"))
            })
    }

    pub fn log_path(&self, config_path: &Path) -> PathBuf {
        match &self.log.file {
            Some(file) => file.clone(),
            None => config_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("quick-links.log"),
        }
    }

    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = r#"[joplin]
url = "http://127.0.0.1:41184"
token = ""  # Web Clipper token, or set QUICK_LINKS_JOPLIN__TOKEN

[links]
show_folders = false     # show the folder of each note in the popup
allow_new_notes = false  # offer "New Note" / "New Task" entries
select_text = false      # select the link title after inserting

[completion]
debounce_ms = 10
query_timeout_ms = 2000
folder_refresh_secs = 60

[editor]
positions = "offsets"  # offsets | lines

[log]
level = "info"
# file = "/tmp/quick-links.log"
"#;

        std::fs::write(path, content)?;
        Ok(())
    }

    fn defaults() -> Self {
        Self {
            joplin: JoplinConfig {
                url: default_url(),
                token: String::new(),
            },
            links: LinkSettings::default(),
            completion: CompletionConfig::default(),
            editor: EditorConfig::default(),
            log: LogConfig::default(),
        }
    }
}

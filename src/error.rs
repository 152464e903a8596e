use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuickLinksError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("unexpected host response to {0}")]
    UnexpectedResponse(&'static str),
}

pub type Result<T> = std::result::Result<T, QuickLinksError>;

/// Structured error data for the message channel
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorInfo {
    Api { status: u16, body: String },
    Network(String),
    CreateNote(String),
    Save(String),
}

impl ErrorInfo {
    pub fn from_error(e: &QuickLinksError) -> Self {
        match e {
            QuickLinksError::Api { status, message } => ErrorInfo::Api {
                status: *status,
                body: message.clone(),
            },
            _ => ErrorInfo::Network(e.to_string()),
        }
    }
}

/// Ready-to-render error popup data
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPopup {
    pub title: String,
    pub message: String,
    pub hint: String,
}

impl ErrorPopup {
    pub fn from_error_info(info: &ErrorInfo) -> Self {
        match info {
            ErrorInfo::Api { status, body } => Self::from_api(*status, body),
            ErrorInfo::Network(msg) => Self {
                title: "Network Error".into(),
                message: truncate(msg, 80),
                hint: "Is Joplin running with the Web Clipper service enabled?".into(),
            },
            ErrorInfo::CreateNote(msg) => Self {
                title: "Note not created".into(),
                message: truncate(msg, 80),
                hint: "No link was inserted".into(),
            },
            ErrorInfo::Save(msg) => Self {
                title: "Save Failed".into(),
                message: truncate(msg, 80),
                hint: "Your changes are still in the editor".into(),
            },
        }
    }

    fn from_api(status: u16, body: &str) -> Self {
        let extracted_message = extract_json_error(body);

        match status {
            403 => Self {
                title: "Forbidden".into(),
                message: "Invalid API token".into(),
                hint: "Check joplin.token in config.toml".into(),
            },
            404 => Self {
                title: "Not Found".into(),
                message: extracted_message.unwrap_or_else(|| "No such note".into()),
                hint: "Check the note id".into(),
            },
            500 => Self {
                title: "Server Error".into(),
                message: extracted_message.unwrap_or_else(|| "Joplin returned an error".into()),
                hint: "Try again later".into(),
            },
            _ => Self {
                title: format!("API Error ({})", status),
                message: extracted_message.unwrap_or_else(|| truncate(body, 200)),
                hint: "Try again later".into(),
            },
        }
    }
}

// Joplin reports failures as {"error": "..."}
fn extract_json_error(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(String::from))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

use quick_links::completion::{CompletionList, CompletionSession, SessionEffect};
use quick_links::editor::EditorBinding;
use quick_links::error::{ErrorInfo, ErrorPopup};

#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    Key(crossterm::event::KeyEvent),
    CandidatesLoaded { seq: u64, list: CompletionList },
    NoteCreated { ticket: u64, id: String },
    CreateFailed { ticket: u64, message: String },
    Saved,
    ApiError(ErrorInfo),
}

/// Work the loop hands to spawned tasks or the settings store.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Session(SessionEffect),
    Save,
    ReloadSettings,
}

pub struct AppState<E: EditorBinding> {
    pub note_id: String,
    pub note_title: String,
    pub editor: E,
    pub session: CompletionSession,
    pub dirty: bool,
    pub saving: bool,
    pub status_message: Option<String>,
    pub hints: Vec<(String, &'static str)>,
    pub error_popup: Option<ErrorPopup>,
    pub should_quit: bool,
}

impl<E: EditorBinding> AppState<E> {
    pub fn new(note_id: &str, note_title: &str, editor: E) -> Self {
        Self {
            note_id: note_id.to_string(),
            note_title: note_title.to_string(),
            editor,
            session: CompletionSession::new(),
            dirty: false,
            saving: false,
            status_message: None,
            hints: default_hints(),
            error_popup: None,
            should_quit: false,
        }
    }

    pub fn show_error(&mut self, info: &ErrorInfo) {
        self.error_popup = Some(ErrorPopup::from_error_info(info));
    }
}

pub fn default_hints() -> Vec<(String, &'static str)> {
    vec![
        ("@@".to_string(), "link"),
        ("C-Space".to_string(), "complete"),
        ("C-s".to_string(), "save"),
        ("C-r".to_string(), "reload settings"),
        ("C-q".to_string(), "quit"),
    ]
}

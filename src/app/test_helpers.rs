use std::sync::Mutex;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use quick_links::bridge::{
    CreateNoteResponse, HostBridge, HostRequest, HostResponse, NewNoteRef, NoteHit, QueryResult,
};
use quick_links::completion::{Candidate, CompletionList};
use quick_links::edit_buffer::EditBuffer;
use quick_links::editor::OffsetEditor;
use quick_links::{QuickLinksError, Result};

use super::AppState;

/// Host stand-in: every `getNotes` gets the same notes, `createNote` succeeds
/// only when an id was configured.
#[derive(Default)]
pub struct StubBridge {
    notes: Vec<NoteHit>,
    created_id: Option<String>,
    requests: Mutex<Vec<HostRequest>>,
}

impl StubBridge {
    pub fn with_notes(notes: &[(&str, &str)]) -> Self {
        Self {
            notes: notes.iter().map(|(id, title)| hit(id, title)).collect(),
            ..Self::default()
        }
    }

    pub fn creating(id: &str) -> Self {
        Self {
            created_id: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<HostRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HostBridge for StubBridge {
    async fn post_message(&self, request: HostRequest) -> Result<HostResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match request {
            HostRequest::GetNotes { .. } => Ok(HostResponse::Notes(QueryResult {
                notes: self.notes.clone(),
                ..QueryResult::default()
            })),
            HostRequest::CreateNote { .. } => match &self.created_id {
                Some(id) => Ok(HostResponse::Created(CreateNoteResponse {
                    new_note: NewNoteRef { id: id.clone() },
                })),
                None => Err(QuickLinksError::Api {
                    status: 500,
                    message: "cannot create".into(),
                }),
            },
        }
    }
}

pub fn hit(id: &str, title: &str) -> NoteHit {
    NoteHit {
        id: id.into(),
        title: title.into(),
        folder: None,
    }
}

pub fn list(notes: &[(&str, &str)]) -> CompletionList {
    CompletionList {
        candidates: notes
            .iter()
            .map(|(id, title)| Candidate::existing(&hit(id, title), false))
            .collect(),
        select_text: false,
    }
}

/// State editing `text` with the cursor at the end.
pub fn test_state(text: &str) -> AppState<OffsetEditor> {
    let mut buffer = EditBuffer::new(text);
    buffer.cursor = buffer.len();
    AppState::new("note-1", "Journal", OffsetEditor::new(buffer))
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn type_text(state: &mut AppState<OffsetEditor>, text: &str) {
    for c in text.chars() {
        super::input::handle_key(state, &key(KeyCode::Char(c)));
    }
}

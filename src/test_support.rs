use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::bridge::{
    CreateNoteResponse, HostBridge, HostRequest, HostResponse, NewNoteRef, NoteHit, QueryResult,
};
use crate::error::{QuickLinksError, Result};

/// In-memory host answering from canned data and recording every request.
#[derive(Default)]
pub struct FakeBridge {
    notes: HashMap<String, Vec<NoteHit>>,
    flags: QueryResult,
    created_id: Option<String>,
    fail_get_notes: bool,
    get_notes_created: Option<String>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<HostRequest>>,
}

impl FakeBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(mut self, prefix: &str, notes: &[(&str, &str)]) -> Self {
        let hits = notes
            .iter()
            .map(|(id, title)| NoteHit {
                id: id.to_string(),
                title: title.to_string(),
                folder: None,
            })
            .collect();
        self.notes.insert(prefix.to_string(), hits);
        self
    }

    pub fn with_flags(mut self, show_folders: bool, allow_new_notes: bool, select_text: bool) -> Self {
        self.flags.show_folders = show_folders;
        self.flags.allow_new_notes = allow_new_notes;
        self.flags.select_text = select_text;
        self
    }

    pub fn with_created_id(mut self, id: &str) -> Self {
        self.created_id = Some(id.to_string());
        self
    }

    pub fn with_delay(mut self, prefix: &str, delay: Duration) -> Self {
        self.delays.insert(prefix.to_string(), delay);
        self
    }

    pub fn failing_get_notes(mut self) -> Self {
        self.fail_get_notes = true;
        self
    }

    pub fn answering_get_notes_with_created(mut self, id: &str) -> Self {
        self.get_notes_created = Some(id.to_string());
        self
    }

    pub fn requests(&self) -> Vec<HostRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HostBridge for FakeBridge {
    async fn post_message(&self, request: HostRequest) -> Result<HostResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match request {
            HostRequest::GetNotes { prefix } => {
                if let Some(delay) = self.delays.get(&prefix) {
                    tokio::time::sleep(*delay).await;
                }
                if self.fail_get_notes {
                    return Err(QuickLinksError::Api {
                        status: 500,
                        message: "search failed".into(),
                    });
                }
                if let Some(id) = &self.get_notes_created {
                    return Ok(HostResponse::Created(CreateNoteResponse {
                        new_note: NewNoteRef { id: id.clone() },
                    }));
                }
                Ok(HostResponse::Notes(QueryResult {
                    notes: self.notes.get(&prefix).cloned().unwrap_or_default(),
                    ..self.flags.clone()
                }))
            }
            HostRequest::CreateNote { .. } => match &self.created_id {
                Some(id) => Ok(HostResponse::Created(CreateNoteResponse {
                    new_note: NewNoteRef { id: id.clone() },
                })),
                None => Err(QuickLinksError::Api {
                    status: 500,
                    message: "create failed".into(),
                }),
            },
        }
    }
}

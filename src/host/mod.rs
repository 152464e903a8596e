//! Joplin-backed host: answers `getNotes` and `createNote` using the Data API,
//! the current [`LinkSettings`] and the folder label snapshot.

pub mod folders;
pub mod settings;

use tokio::sync::watch;

use crate::api::client::JoplinClient;
use crate::api::types::{NewNote, NoteSummary};
use crate::bridge::{
    CreateNoteResponse, HostBridge, HostRequest, HostResponse, NewNoteRef, NoteHit, QueryResult,
};
use crate::completion::candidate::UNKNOWN_FOLDER;
use crate::error::Result;

pub use folders::{FolderLabelCache, FolderLabels};
pub use settings::{LinkSettings, SettingsStore};

/// The note currently open in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNote {
    pub id: String,
    pub parent_id: String,
}

pub struct HostService {
    client: JoplinClient,
    settings: watch::Receiver<LinkSettings>,
    folders: watch::Receiver<FolderLabels>,
    active: watch::Sender<Option<ActiveNote>>,
}

impl HostService {
    pub fn new(
        client: JoplinClient,
        settings: watch::Receiver<LinkSettings>,
        folders: watch::Receiver<FolderLabels>,
    ) -> Self {
        let (active, _) = watch::channel(None);
        Self {
            client,
            settings,
            folders,
            active,
        }
    }

    pub fn client(&self) -> &JoplinClient {
        &self.client
    }

    pub fn set_active_note(&self, note: Option<ActiveNote>) {
        self.active.send_replace(note);
    }

    pub async fn get_notes(&self, prefix: &str) -> Result<QueryResult> {
        let notes = if prefix.trim().is_empty() {
            self.client.recent_notes().await?
        } else {
            self.client.search_notes(prefix).await?
        };

        // snapshots taken after the await so no borrow is held across it
        let settings = *self.settings.borrow();
        let folders = self.folders.borrow().clone();
        let active_id = self.active.borrow().as_ref().map(|n| n.id.clone());

        let hits = notes
            .into_iter()
            .filter(|n| Some(&n.id) != active_id.as_ref())
            .map(|n| to_hit(n, settings.show_folders, &folders))
            .collect();

        Ok(QueryResult {
            notes: hits,
            show_folders: settings.show_folders,
            allow_new_notes: settings.allow_new_notes,
            select_text: settings.select_text,
        })
    }

    pub async fn create_note(&self, title: &str, todo: bool) -> Result<String> {
        let parent_id = self
            .active
            .borrow()
            .as_ref()
            .map(|n| n.parent_id.clone())
            .filter(|p| !p.is_empty());
        let note = NewNote {
            title: title.to_string(),
            is_todo: todo,
            parent_id,
        };
        let created = self.client.create_note(&note).await?;
        tracing::info!(id = %created.id, todo, "created note");
        Ok(created.id)
    }
}

fn to_hit(note: NoteSummary, show_folders: bool, folders: &FolderLabels) -> NoteHit {
    let folder = show_folders.then(|| {
        folders
            .get(&note.parent_id)
            .unwrap_or(UNKNOWN_FOLDER)
            .to_string()
    });
    NoteHit {
        id: note.id,
        title: note.title,
        folder,
    }
}

impl HostBridge for HostService {
    async fn post_message(&self, request: HostRequest) -> Result<HostResponse> {
        tracing::debug!(command = request.command(), "host request");
        match request {
            HostRequest::GetNotes { prefix } => {
                self.get_notes(&prefix).await.map(HostResponse::Notes)
            }
            HostRequest::CreateNote { title, todo } => {
                let id = self.create_note(&title, todo).await?;
                Ok(HostResponse::Created(CreateNoteResponse {
                    new_note: NewNoteRef { id },
                }))
            }
        }
    }
}

use crate::bridge::NoteHit;

/// Folder label shown when a note's folder is missing from the folder cache.
pub const UNKNOWN_FOLDER: &str = "unknown";

const NEW_NOTE_LABEL: &str = "New Note";
const NEW_TASK_LABEL: &str = "New Task";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKind {
    ExistingNote { id: String },
    NewNote,
    NewTask,
}

/// One entry of the completion popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text shown in the popup.
    pub label: String,
    /// Title inserted into the link (and given to a created note).
    pub title: String,
    pub kind: CandidateKind,
    /// Set only when folder labels are enabled.
    pub folder: Option<String>,
}

impl Candidate {
    pub fn existing(hit: &NoteHit, show_folders: bool) -> Self {
        let folder = show_folders.then(|| {
            hit.folder
                .clone()
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| UNKNOWN_FOLDER.to_string())
        });
        Self {
            label: hit.title.clone(),
            title: hit.title.clone(),
            kind: CandidateKind::ExistingNote { id: hit.id.clone() },
            folder,
        }
    }

    pub fn new_note(prefix: &str) -> Self {
        Self {
            label: NEW_NOTE_LABEL.into(),
            title: prefix.to_string(),
            kind: CandidateKind::NewNote,
            folder: None,
        }
    }

    pub fn new_task(prefix: &str) -> Self {
        Self {
            label: NEW_TASK_LABEL.into(),
            title: prefix.to_string(),
            kind: CandidateKind::NewTask,
            folder: None,
        }
    }

    pub fn is_create(&self) -> bool {
        !matches!(self.kind, CandidateKind::ExistingNote { .. })
    }

    /// Right-hand annotation in the popup.
    pub fn detail(&self) -> Option<String> {
        match self.kind {
            CandidateKind::ExistingNote { .. } => {
                self.folder.as_ref().map(|f| format!("In {}", f))
            }
            CandidateKind::NewNote | CandidateKind::NewTask => Some(format!("\"{}\"", self.title)),
        }
    }

    /// True when the title would break `[title](:/id)` link syntax.
    pub fn has_link_breaking_title(&self) -> bool {
        self.title.contains([']', ')', '\n'])
    }
}

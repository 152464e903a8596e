use super::candidate::{Candidate, CandidateKind};
use super::trigger::TriggerSpan;

/// Replacement of the trigger span by a markdown link, in character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEdit {
    pub from: usize,
    pub to: usize,
    pub text: String,
    /// `(start, end)` of the title inside the inserted link.
    pub selection: Option<(usize, usize)>,
}

impl LinkEdit {
    pub fn inserted_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyPlan {
    Edit(LinkEdit),
    /// The note must be created first; finish with [`link_edit`] once the
    /// host returns its id.
    Create { title: String, todo: bool },
}

/// Internal Joplin link: `[title](:/id)`.
pub fn markdown_link(title: &str, id: &str) -> String {
    format!("[{}](:/{})", title, id)
}

pub fn link_edit(title: &str, id: &str, span: TriggerSpan, select_text: bool) -> LinkEdit {
    let selection = select_text.then(|| {
        let start = span.start + 1;
        (start, start + title.chars().count())
    });
    LinkEdit {
        from: span.start,
        to: span.end,
        text: markdown_link(title, id),
        selection,
    }
}

pub fn apply_candidate(candidate: &Candidate, span: TriggerSpan, select_text: bool) -> ApplyPlan {
    if candidate.has_link_breaking_title() {
        tracing::warn!(title = %candidate.title, "title breaks markdown link syntax, inserting as-is");
    }
    match &candidate.kind {
        CandidateKind::ExistingNote { id } => {
            ApplyPlan::Edit(link_edit(&candidate.title, id, span, select_text))
        }
        CandidateKind::NewNote => ApplyPlan::Create {
            title: candidate.title.clone(),
            todo: false,
        },
        CandidateKind::NewTask => ApplyPlan::Create {
            title: candidate.title.clone(),
            todo: true,
        },
    }
}

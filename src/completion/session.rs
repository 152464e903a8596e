//! Per-session completion state machine.
//!
//! `Idle → Querying → Listing → (Applying →) Idle`. The session never does I/O
//! itself: it hands back [`SessionEffect`]s for the caller to run and is fed the
//! outcomes through `on_results`, `on_note_created` and `on_create_failed`.

use crate::editor::EditorBinding;
use crate::error::ErrorInfo;

use super::apply::{apply_candidate, link_edit, ApplyPlan};
use super::candidate::Candidate;
use super::source::{should_query, CompletionList, QuerySeq};
use super::trigger::{detect_trigger, TriggerSpan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    /// Marker seen, but the prefix is empty and nobody asked for completion.
    Triggered,
    Querying,
    Listing,
    Applying { ticket: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    Query {
        seq: u64,
        prefix: String,
        explicit: bool,
    },
    CreateNote {
        ticket: u64,
        title: String,
        todo: bool,
    },
    Notice(ErrorInfo),
}

/// What [`CompletionSession::accept`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum Accept {
    /// The link was written into the editor.
    Inserted,
    /// The note has to be created first. Run the effect.
    Create(SessionEffect),
    /// Results for the current prefix are still on their way. Nothing changed.
    Waiting,
    /// Nothing was applied. The session may have closed.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
struct PendingCreate {
    ticket: u64,
    span_start: usize,
    title: String,
}

#[derive(Debug)]
pub struct CompletionSession {
    phase: SessionPhase,
    span: Option<TriggerSpan>,
    candidates: Vec<Candidate>,
    /// Span the current candidates were built for.
    list_span: Option<TriggerSpan>,
    selected: usize,
    select_text: bool,
    seq: QuerySeq,
    next_ticket: u64,
    pending: Option<PendingCreate>,
}

impl Default for CompletionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            span: None,
            candidates: Vec::new(),
            list_span: None,
            selected: 0,
            select_text: false,
            seq: QuerySeq::new(),
            next_ticket: 0,
            pending: None,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != SessionPhase::Idle
    }

    pub fn span(&self) -> Option<TriggerSpan> {
        self.span
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Counter shared with query tasks so they can drop superseded work.
    pub fn query_seq(&self) -> QuerySeq {
        self.seq.clone()
    }

    /// Previous candidates stay on screen while a newer query is in flight.
    pub fn popup_visible(&self) -> bool {
        matches!(self.phase, SessionPhase::Querying | SessionPhase::Listing)
            && !self.candidates.is_empty()
    }

    /// Called after every document edit or cursor move.
    pub fn on_edit(&mut self, chars: &[char], cursor: usize) -> Option<SessionEffect> {
        self.refresh(chars, cursor, false)
    }

    /// Explicit completion request (e.g. Ctrl+Space).
    pub fn request_explicit(&mut self, chars: &[char], cursor: usize) -> Option<SessionEffect> {
        self.refresh(chars, cursor, true)
    }

    fn refresh(&mut self, chars: &[char], cursor: usize, explicit: bool) -> Option<SessionEffect> {
        if matches!(self.phase, SessionPhase::Applying { .. }) {
            // the span is re-checked when the created note comes back
            return None;
        }

        let Some(span) = detect_trigger(chars, cursor) else {
            if self.is_active() {
                tracing::debug!("trigger span left, closing completion");
                self.close();
            }
            return None;
        };

        if self.span.is_some_and(|s| s.start != span.start) {
            self.clear_list();
        }
        self.span = Some(span);

        let prefix = span.prefix(chars);
        let seq = self.seq.bump();
        if !should_query(&prefix, explicit) {
            self.phase = SessionPhase::Triggered;
            self.clear_list();
            return None;
        }

        self.phase = SessionPhase::Querying;
        Some(SessionEffect::Query {
            seq,
            prefix,
            explicit,
        })
    }

    /// Delivers query results. Returns false when they were discarded because a
    /// newer query has been issued since (or the session closed).
    pub fn on_results(&mut self, seq: u64, list: CompletionList) -> bool {
        if !self.seq.is_current(seq) {
            tracing::debug!(seq, latest = self.seq.current(), "discarding stale results");
            return false;
        }
        if !matches!(self.phase, SessionPhase::Querying | SessionPhase::Listing) {
            return false;
        }
        self.candidates = list.candidates;
        self.list_span = self.span;
        self.select_text = list.select_text;
        self.selected = 0;
        self.phase = SessionPhase::Listing;
        true
    }

    pub fn select_next(&mut self) {
        if !self.candidates.is_empty() && self.selected < self.candidates.len() - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Applies the selected candidate. Existing notes are linked immediately;
    /// create entries return a `CreateNote` effect and the link is inserted by
    /// [`Self::on_note_created`].
    ///
    /// The candidates shown while a newer query is in flight belong to an older
    /// prefix, so accepting waits for the fresh list.
    pub fn accept<E: EditorBinding>(&mut self, editor: &mut E) -> Accept {
        if !self.popup_visible() {
            return Accept::Ignored;
        }
        if self.phase == SessionPhase::Querying {
            tracing::debug!("accept while querying, waiting for current results");
            return Accept::Waiting;
        }
        let Some(candidate) = self.candidates.get(self.selected).cloned() else {
            return Accept::Ignored;
        };
        let Some(span) = self.current_span(editor) else {
            tracing::warn!("trigger span changed before apply, dropping completion");
            self.close();
            return Accept::Ignored;
        };

        match apply_candidate(&candidate, span, self.select_text) {
            ApplyPlan::Edit(edit) => {
                editor.apply_link_edit(&edit);
                self.close();
                Accept::Inserted
            }
            ApplyPlan::Create { title, todo } => {
                self.next_ticket += 1;
                let ticket = self.next_ticket;
                self.pending = Some(PendingCreate {
                    ticket,
                    span_start: span.start,
                    title: title.clone(),
                });
                self.phase = SessionPhase::Applying { ticket };
                Accept::Create(SessionEffect::CreateNote {
                    ticket,
                    title,
                    todo,
                })
            }
        }
    }

    /// Finishes a create entry. Returns true if the link was inserted.
    pub fn on_note_created<E: EditorBinding>(
        &mut self,
        ticket: u64,
        note_id: &str,
        editor: &mut E,
    ) -> bool {
        let Some(pending) = self.take_pending(ticket) else {
            tracing::debug!(ticket, "note created for a cancelled completion");
            return false;
        };

        let span = detect_trigger(editor.chars(), editor.cursor_offset())
            .filter(|s| s.start == pending.span_start);
        self.close();

        match span {
            Some(span) => {
                let edit = link_edit(&pending.title, note_id, span, self.select_text);
                editor.apply_link_edit(&edit);
                true
            }
            None => {
                tracing::warn!(note_id, "trigger span gone after note creation, link not inserted");
                false
            }
        }
    }

    pub fn on_create_failed(&mut self, ticket: u64, message: String) -> Option<SessionEffect> {
        self.take_pending(ticket)?;
        self.close();
        Some(SessionEffect::Notice(ErrorInfo::CreateNote(message)))
    }

    /// Esc, focus loss, or anything else that closes the popup.
    pub fn dismiss(&mut self) {
        if self.is_active() {
            self.close();
        }
    }

    fn take_pending(&mut self, ticket: u64) -> Option<PendingCreate> {
        match &self.pending {
            Some(p) if p.ticket == ticket => self.pending.take(),
            _ => None,
        }
    }

    /// The live span, only if it is exactly the one the list was built for.
    fn current_span<E: EditorBinding>(&self, editor: &E) -> Option<TriggerSpan> {
        let expected = self.list_span?;
        detect_trigger(editor.chars(), editor.cursor_offset()).filter(|s| *s == expected)
    }

    fn clear_list(&mut self) {
        self.candidates.clear();
        self.list_span = None;
        self.selected = 0;
    }

    fn close(&mut self) {
        // invalidates in-flight queries
        self.seq.bump();
        self.phase = SessionPhase::Idle;
        self.span = None;
        self.clear_list();
        self.pending = None;
    }
}

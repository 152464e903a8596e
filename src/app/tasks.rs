use std::sync::Arc;

use tokio::sync::mpsc;

use quick_links::bridge::{self, HostBridge};
use quick_links::completion::{CompletionSource, QuerySeq, SessionEffect};
use quick_links::error::ErrorInfo;
use quick_links::JoplinClient;

use super::state::AppMessage;

/// Runs a session effect in the background. `Notice` effects are handled by
/// the caller and ignored here.
pub(super) fn spawn_effect<B: HostBridge>(
    effect: SessionEffect,
    source: &Arc<CompletionSource<B>>,
    latest: &QuerySeq,
    tx: &mpsc::UnboundedSender<AppMessage>,
) {
    match effect {
        SessionEffect::Query {
            seq,
            prefix,
            explicit,
        } => spawn_query(source, latest, seq, prefix, explicit, tx),
        SessionEffect::CreateNote {
            ticket,
            title,
            todo,
        } => spawn_create_note(source.bridge(), ticket, title, todo, tx),
        SessionEffect::Notice(_) => {}
    }
}

pub(super) fn spawn_query<B: HostBridge>(
    source: &Arc<CompletionSource<B>>,
    latest: &QuerySeq,
    seq: u64,
    prefix: String,
    explicit: bool,
    tx: &mpsc::UnboundedSender<AppMessage>,
) {
    let source = source.clone();
    let latest = latest.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        if let Some(list) = source
            .complete_debounced(seq, &latest, &prefix, explicit)
            .await
        {
            let _ = tx.send(AppMessage::CandidatesLoaded { seq, list });
        }
    });
}

pub(super) fn spawn_create_note<B: HostBridge>(
    host: &Arc<B>,
    ticket: u64,
    title: String,
    todo: bool,
    tx: &mpsc::UnboundedSender<AppMessage>,
) {
    let host = host.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let msg = match bridge::create_note(host.as_ref(), &title, todo).await {
            Ok(id) => AppMessage::NoteCreated { ticket, id },
            Err(e) => {
                tracing::warn!(error = %e, title = %title, "createNote failed");
                AppMessage::CreateFailed {
                    ticket,
                    message: e.to_string(),
                }
            }
        };
        let _ = tx.send(msg);
    });
}

pub(super) fn spawn_save(
    client: &JoplinClient,
    note_id: &str,
    body: String,
    tx: &mpsc::UnboundedSender<AppMessage>,
) {
    let client = client.clone();
    let tx = tx.clone();
    let note_id = note_id.to_string();
    tokio::spawn(async move {
        match client.update_body(&note_id, &body).await {
            Ok(()) => {
                let _ = tx.send(AppMessage::Saved);
            }
            Err(e) => {
                let _ = tx.send(AppMessage::ApiError(ErrorInfo::Save(e.to_string())));
            }
        }
    });
}

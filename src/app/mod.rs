mod input;
mod state;
mod tasks;
pub use state::*;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use quick_links::bridge::HostBridge;
use quick_links::completion::{CompletionSource, SessionEffect};
use quick_links::editor::EditorBinding;
use quick_links::error::ErrorPopup;
use quick_links::host::SettingsStore;
use quick_links::{JoplinClient, Result};

use crate::config::AppConfig;
use input::handle_key;
use tasks::{spawn_effect, spawn_save};

/// Everything the loop talks to besides the editor state.
pub struct Services<B: HostBridge> {
    pub source: Arc<CompletionSource<B>>,
    pub client: JoplinClient,
    pub settings: Arc<SettingsStore>,
    pub config_path: PathBuf,
}

/// Applies one message to the state. Returned commands still have to be run.
pub fn handle_message<E: EditorBinding>(
    state: &mut AppState<E>,
    msg: AppMessage,
) -> Option<Command> {
    match msg {
        AppMessage::Key(key) => handle_key(state, &key),
        AppMessage::CandidatesLoaded { seq, list } => {
            state.session.on_results(seq, list);
            None
        }
        AppMessage::NoteCreated { ticket, id } => {
            if state.session.on_note_created(ticket, &id, &mut state.editor) {
                state.dirty = true;
                state.status_message = Some("Linked new note".into());
            } else {
                state.status_message = None;
            }
            None
        }
        AppMessage::CreateFailed { ticket, message } => {
            state.status_message = None;
            if let Some(SessionEffect::Notice(info)) =
                state.session.on_create_failed(ticket, message)
            {
                state.show_error(&info);
            }
            None
        }
        AppMessage::Saved => {
            state.saving = false;
            state.dirty = false;
            state.status_message = Some("Saved".into());
            None
        }
        AppMessage::ApiError(err) => {
            state.saving = false;
            state.show_error(&err);
            None
        }
    }
}

pub fn reload_settings<E: EditorBinding>(
    state: &mut AppState<E>,
    settings: &SettingsStore,
    config_path: &std::path::Path,
) {
    match AppConfig::load_from_path(config_path) {
        Ok(config) => {
            let message = if settings.replace(config.links) {
                "Settings reloaded"
            } else {
                "Settings unchanged"
            };
            state.status_message = Some(message.into());
        }
        Err(e) => {
            tracing::warn!(error = %e, "settings reload failed");
            state.error_popup = Some(ErrorPopup {
                title: "Config Error".into(),
                message: e.to_string(),
                hint: "Fix the config file and press Ctrl+R again".into(),
            });
        }
    }
}

fn run_command<E: EditorBinding, B: HostBridge>(
    state: &mut AppState<E>,
    command: Command,
    services: &Services<B>,
    tx: &mpsc::UnboundedSender<AppMessage>,
) {
    match command {
        Command::Session(SessionEffect::Notice(info)) => state.show_error(&info),
        Command::Session(effect) => {
            let latest = state.session.query_seq();
            spawn_effect(effect, &services.source, &latest, tx);
        }
        Command::Save => {
            if state.saving {
                return;
            }
            state.saving = true;
            state.status_message = Some("Saving...".into());
            spawn_save(&services.client, &state.note_id, state.editor.buffer().text(), tx);
        }
        Command::ReloadSettings => {
            reload_settings(state, &services.settings, &services.config_path)
        }
    }
}

pub async fn run<E: EditorBinding, B: HostBridge>(
    mut state: AppState<E>,
    services: Services<B>,
    terminal: &mut DefaultTerminal,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppMessage>();

    // Spawn event reader task
    let event_tx = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if event_tx.send(AppMessage::Key(key)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
                _ => {}
            }
        }
    });

    loop {
        terminal.draw(|frame| crate::ui::render(frame, &state))?;

        if let Some(msg) = rx.recv().await {
            if let Some(command) = handle_message(&mut state, msg) {
                run_command(&mut state, command, &services, &tx);
            }
        }

        if state.should_quit {
            break;
        }
    }

    if state.dirty {
        tracing::info!(note_id = %state.note_id, "quit with unsaved changes");
    }
    Ok(())
}

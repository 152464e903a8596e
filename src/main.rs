mod app;
mod config;
mod logging;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use quick_links::completion::CompletionSource;
use quick_links::edit_buffer::EditBuffer;
use quick_links::editor::{EditorBinding, LineColumnEditor, OffsetEditor};
use quick_links::host::{folders, ActiveNote, FolderLabelCache, HostService, SettingsStore};
use quick_links::JoplinClient;

use app::{AppState, Services};
use config::{AppConfig, PositionMode};

fn config_path() -> PathBuf {
    AppConfig::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

async fn run_editor<E: EditorBinding>(
    state: AppState<E>,
    services: Services<HostService>,
) -> quick_links::Result<()> {
    let mut terminal = ratatui::init();

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let result = app::run(state, services, &mut terminal).await;
    ratatui::restore();
    result
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(note_id) = std::env::args().nth(1) else {
        eprintln!("Usage: quick-links <note-id>");
        return Ok(());
    };

    let path = config_path();

    if !path.exists() {
        AppConfig::write_default(&path)?;
        eprintln!(
            "Created default config at: {}\nPlease add your Joplin Web Clipper token, then run again.",
            path.display()
        );
        return Ok(());
    }

    let config = match AppConfig::load_from_path(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", path.display(), e);
            eprintln!("Fix the config file or delete it to regenerate defaults.");
            return Ok(());
        }
    };

    let _log_guard = logging::init(&config.log.level, &config.log_path(&path))?;
    tracing::info!(note_id = %note_id, "starting");

    let client = JoplinClient::new(&config.joplin.url, &config.joplin.token);
    let note = match client.note(&note_id).await {
        Ok(note) => note,
        Err(e) => {
            eprintln!("Could not load note {}: {}", note_id, e);
            eprintln!("Is Joplin running with the Web Clipper service enabled?");
            return Ok(());
        }
    };

    let settings = Arc::new(SettingsStore::new(config.links));
    let folder_cache = Arc::new(FolderLabelCache::new());
    let refresh = folders::spawn_refresh(
        client.clone(),
        folder_cache.clone(),
        config.completion.folder_refresh(),
    );

    let host = HostService::new(client.clone(), settings.subscribe(), folder_cache.subscribe());
    host.set_active_note(Some(ActiveNote {
        id: note.id.clone(),
        parent_id: note.parent_id.clone(),
    }));

    let source = CompletionSource::new(Arc::new(host))
        .with_debounce(config.completion.debounce())
        .with_timeout(config.completion.query_timeout());
    let services = Services {
        source: Arc::new(source),
        client,
        settings,
        config_path: path,
    };

    let buffer = EditBuffer::new(&note.body);
    let result = match config.editor.positions {
        PositionMode::Offsets => {
            let state = AppState::new(&note.id, &note.title, OffsetEditor::new(buffer));
            run_editor(state, services).await
        }
        PositionMode::Lines => {
            let state = AppState::new(&note.id, &note.title, LineColumnEditor::new(buffer));
            run_editor(state, services).await
        }
    };

    refresh.abort();

    if let Err(e) = result {
        tracing::error!(error = %e, "editor loop failed");
        eprintln!("Error: {}", e);
    }

    Ok(())
}

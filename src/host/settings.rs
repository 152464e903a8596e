use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// User preferences consumed by the host when answering `getNotes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSettings {
    #[serde(default)]
    pub show_folders: bool,
    #[serde(default)]
    pub allow_new_notes: bool,
    #[serde(default)]
    pub select_text: bool,
}

/// Holds the current settings snapshot. Updates replace the whole value and
/// wake every subscriber.
pub struct SettingsStore {
    tx: watch::Sender<LinkSettings>,
}

impl SettingsStore {
    pub fn new(initial: LinkSettings) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn snapshot(&self) -> LinkSettings {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LinkSettings> {
        self.tx.subscribe()
    }

    /// Returns true if anything changed.
    pub fn replace(&self, settings: LinkSettings) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == settings {
                return false;
            }
            *current = settings;
            true
        });
        if changed {
            tracing::info!(?settings, "link settings changed");
        }
        changed
    }
}

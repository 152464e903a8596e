use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::client::JoplinClient;
use crate::api::types::Folder;
use crate::error::Result;

// Stop paging if the server keeps claiming more.
const MAX_FOLDER_PAGES: u32 = 200;

/// Folder id to folder title. Cloning shares the underlying map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderLabels(Arc<HashMap<String, String>>);

impl FolderLabels {
    pub fn from_folders(folders: impl IntoIterator<Item = Folder>) -> Self {
        let map = folders.into_iter().map(|f| (f.id, f.title)).collect();
        Self(Arc::new(map))
    }

    pub fn get(&self, folder_id: &str) -> Option<&str> {
        self.0.get(folder_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Latest folder snapshot. Readers never see a half-built map: a refresh
/// swaps in a complete [`FolderLabels`] at once.
pub struct FolderLabelCache {
    tx: watch::Sender<FolderLabels>,
}

impl FolderLabelCache {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(FolderLabels::default());
        Self { tx }
    }

    pub fn snapshot(&self) -> FolderLabels {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FolderLabels> {
        self.tx.subscribe()
    }

    pub fn replace(&self, labels: FolderLabels) {
        self.tx.send_replace(labels);
    }
}

impl Default for FolderLabelCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks every `/folders` page and merges them into one map.
pub async fn fetch_all(client: &JoplinClient) -> Result<FolderLabels> {
    let mut folders = Vec::new();
    let mut page = 1;
    loop {
        let resp = client.folders_page(page).await?;
        folders.extend(resp.items);
        if !resp.has_more {
            break;
        }
        if page >= MAX_FOLDER_PAGES {
            tracing::warn!(page, "folder listing still reports more pages, giving up");
            break;
        }
        page += 1;
    }
    Ok(FolderLabels::from_folders(folders))
}

/// Loads folders immediately, then again every `interval`. A failed refresh
/// keeps the previous snapshot.
pub fn spawn_refresh(
    client: JoplinClient,
    cache: Arc<FolderLabelCache>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match fetch_all(&client).await {
                Ok(labels) => {
                    tracing::debug!(count = labels.len(), "folder labels refreshed");
                    cache.replace(labels);
                }
                Err(e) => tracing::warn!(error = %e, "folder refresh failed"),
            }
        }
    })
}

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::api::queries::{self, Params};
use crate::api::types::{
    BodyUpdate, CreatedNote, Folder, NewNote, Note, NoteSummary, Paginated,
};
use crate::error::{QuickLinksError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:41184";

/// Thin client for the Joplin Data API (the Web Clipper service).
#[derive(Clone)]
pub struct JoplinClient {
    client: Client,
    base_url: String,
    token: String,
}

impl JoplinClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub async fn recent_notes(&self) -> Result<Vec<NoteSummary>> {
        let page: Paginated<NoteSummary> = self.get("/notes", queries::recent_notes()).await?;
        Ok(page.items)
    }

    pub async fn search_notes(&self, prefix: &str) -> Result<Vec<NoteSummary>> {
        let page: Paginated<NoteSummary> = self
            .get("/search", queries::notes_by_title_prefix(prefix))
            .await?;
        Ok(page.items)
    }

    pub async fn folders_page(&self, page: u32) -> Result<Paginated<Folder>> {
        self.get("/folders", queries::folder_page(page)).await
    }

    pub async fn note(&self, id: &str) -> Result<Note> {
        self.get(&format!("/notes/{}", id), queries::note_with_body())
            .await
    }

    pub async fn create_note(&self, note: &NewNote) -> Result<CreatedNote> {
        let resp = self
            .client
            .post(format!("{}/notes", self.base_url))
            .query(&[("token", &self.token)])
            .json(note)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json::<CreatedNote>().await?)
    }

    pub async fn update_body(&self, id: &str, body: &str) -> Result<()> {
        let resp = self
            .client
            .put(format!("{}/notes/{}", self.base_url, id))
            .query(&[("token", &self.token)])
            .json(&BodyUpdate {
                body: body.to_string(),
            })
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: Params) -> Result<T> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("token", &self.token)])
            .query(&params)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json::<T>().await?)
    }
}

async fn check_status(resp: Response) -> Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    Err(QuickLinksError::Api { status, message })
}

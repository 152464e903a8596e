//! Message contract between the editor-side completion core and the host that
//! owns note storage.
//!
//! Every exchange is a single request/response round trip. The editor side only
//! ever sees [`HostRequest`] and [`HostResponse`]; how the host answers is its
//! own business (see [`crate::host::HostService`] for the Joplin-backed one).

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::{QuickLinksError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostRequest {
    GetNotes { prefix: String },
    CreateNote { title: String, todo: bool },
}

impl HostRequest {
    pub fn command(&self) -> &'static str {
        match self {
            HostRequest::GetNotes { .. } => "getNotes",
            HostRequest::CreateNote { .. } => "createNote",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum HostResponse {
    Notes(QueryResult),
    Created(CreateNoteResponse),
}

/// Answer to `getNotes`: the matching notes plus the settings snapshot the
/// editor needs to build and apply candidates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub notes: Vec<NoteHit>,
    pub show_folders: bool,
    pub allow_new_notes: bool,
    pub select_text: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteHit {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteResponse {
    pub new_note: NewNoteRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewNoteRef {
    pub id: String,
}

pub trait HostBridge: Send + Sync + 'static {
    fn post_message(
        &self,
        request: HostRequest,
    ) -> impl Future<Output = Result<HostResponse>> + Send;
}

pub async fn get_notes<B: HostBridge>(bridge: &B, prefix: &str) -> Result<QueryResult> {
    let request = HostRequest::GetNotes {
        prefix: prefix.to_string(),
    };
    match bridge.post_message(request).await? {
        HostResponse::Notes(result) => Ok(result),
        HostResponse::Created(_) => Err(QuickLinksError::UnexpectedResponse("getNotes")),
    }
}

/// Asks the host to create a note and returns its id.
pub async fn create_note<B: HostBridge>(bridge: &B, title: &str, todo: bool) -> Result<String> {
    let request = HostRequest::CreateNote {
        title: title.to_string(),
        todo,
    };
    match bridge.post_message(request).await? {
        HostResponse::Created(resp) => Ok(resp.new_note.id),
        HostResponse::Notes(_) => Err(QuickLinksError::UnexpectedResponse("createNote")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeBridge;
    use serde_json::json;

    #[test]
    fn get_notes_request_wire_format() {
        let req = HostRequest::GetNotes {
            prefix: "meet".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"command": "getNotes", "prefix": "meet"}));
    }

    #[test]
    fn create_note_request_wire_format() {
        let req = HostRequest::CreateNote {
            title: "draft".into(),
            todo: true,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({"command": "createNote", "title": "draft", "todo": true})
        );
    }

    #[test]
    fn notes_response_parses_from_host_json() {
        let raw = r#"{
            "notes": [{"id": "a", "title": "Alpha", "folder": "Work"}, {"id": "b", "title": "Beta"}],
            "showFolders": true,
            "allowNewNotes": false,
            "selectText": true
        }"#;
        let resp: HostResponse = serde_json::from_str(raw).unwrap();
        match resp {
            HostResponse::Notes(result) => {
                assert_eq!(result.notes.len(), 2);
                assert_eq!(result.notes[0].folder.as_deref(), Some("Work"));
                assert_eq!(result.notes[1].folder, None);
                assert!(result.show_folders);
                assert!(!result.allow_new_notes);
                assert!(result.select_text);
            }
            other => panic!("Expected Notes, got {:?}", other),
        }
    }

    #[test]
    fn created_response_parses_from_host_json() {
        let raw = r#"{"newNote": {"id": "n42"}}"#;
        let resp: HostResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            resp,
            HostResponse::Created(CreateNoteResponse {
                new_note: NewNoteRef { id: "n42".into() }
            })
        );
    }

    #[test]
    fn command_names_match_wire_tags() {
        assert_eq!(
            HostRequest::GetNotes { prefix: "".into() }.command(),
            "getNotes"
        );
        assert_eq!(
            HostRequest::CreateNote {
                title: "".into(),
                todo: false
            }
            .command(),
            "createNote"
        );
    }

    #[tokio::test]
    async fn create_note_returns_new_id() {
        let bridge = FakeBridge::new().with_created_id("fresh");
        let id = create_note(&bridge, "draft", false).await.unwrap();
        assert_eq!(id, "fresh");
        assert_eq!(
            bridge.requests(),
            vec![HostRequest::CreateNote {
                title: "draft".into(),
                todo: false
            }]
        );
    }

    #[tokio::test]
    async fn get_notes_rejects_mismatched_response() {
        let bridge = FakeBridge::new().answering_get_notes_with_created("oops");
        let err = get_notes(&bridge, "x").await.unwrap_err();
        assert!(matches!(err, QuickLinksError::UnexpectedResponse("getNotes")));
    }
}

use serde::{Deserialize, Serialize};

/// One page of a Joplin listing endpoint (`/notes`, `/search`, `/folders`).
#[derive(Debug, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub parent_id: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Folder {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub parent_id: String,
}

#[derive(Debug, Serialize)]
pub struct NewNote {
    pub title: String,
    #[serde(serialize_with = "bool_as_int")]
    pub is_todo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedNote {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct BodyUpdate {
    pub body: String,
}

// Joplin stores flags as 0/1
fn bool_as_int<S: serde::Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*value))
}

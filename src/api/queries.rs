pub const RECENT_NOTES_LIMIT: usize = 11;
pub const SEARCH_LIMIT: usize = 21;

const NOTE_FIELDS: &str = "id,title,parent_id";
const FOLDER_FIELDS: &str = "id,title";

pub type Params = Vec<(&'static str, String)>;

/// Joplin search syntax for "title starts with".
pub fn title_search(prefix: &str) -> String {
    format!("title:{}*", prefix.trim_end())
}

pub fn recent_notes() -> Params {
    vec![
        ("fields", NOTE_FIELDS.into()),
        ("order_by", "updated_time".into()),
        ("order_dir", "DESC".into()),
        ("limit", RECENT_NOTES_LIMIT.to_string()),
    ]
}

pub fn notes_by_title_prefix(prefix: &str) -> Params {
    vec![
        ("query", title_search(prefix)),
        ("type", "note".into()),
        ("fields", NOTE_FIELDS.into()),
        ("limit", SEARCH_LIMIT.to_string()),
    ]
}

pub fn folder_page(page: u32) -> Params {
    vec![("fields", FOLDER_FIELDS.into()), ("page", page.to_string())]
}

pub fn note_with_body() -> Params {
    vec![("fields", "id,title,body,parent_id".into())]
}

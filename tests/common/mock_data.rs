//! JSON builders for backend records.
//!
//! Bodies are built as the backend sends them, so the same values feed both
//! the in-memory gateway and wiremock responses.

use serde_json::{Value, json};

pub fn user(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        "full_name": name,
        "role": "family_member",
    })
}

/// `count` users named `User 1`, `User 2`, ...
pub fn users(count: u64) -> Vec<Value> {
    (1..=count).map(|i| user(i, &format!("User {i}"))).collect()
}

pub fn kid(id: u64, name: &str, birth_date: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "birth_date": birth_date,
        "gender": "female",
        "avatar_url": format!("/uploads/kids/{id}.jpg"),
        "growth": [],
    })
}

pub fn photo(id: u64, album_id: u64, taken_at: &str) -> Value {
    json!({
        "id": id,
        "album_id": album_id,
        "caption": format!("photo {id}"),
        "url": format!("/uploads/photos/{id}.jpg"),
        "taken_at": taken_at,
        "like_count": 0,
        "liked": false,
        "view_count": 0,
    })
}

pub fn milestone(id: u64, kid_id: u64, title: &str, achieved_on: &str) -> Value {
    json!({
        "id": id,
        "kid_id": kid_id,
        "title": title,
        "category": "motor",
        "achieved_on": achieved_on,
    })
}

/// List envelope with an explicit total.
pub fn envelope(items: &[Value], total: u64) -> Value {
    json!({ "items": items, "total": total })
}

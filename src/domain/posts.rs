//! The post entity as the collection endpoint serves it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

/// Request payload for create, replace and partial update.
pub type PostFields = Map<String, Value>;

/// Server-assigned identifier. Backends hand out either numbers or strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl PostId {
    pub fn is_blank(&self) -> bool {
        match self {
            PostId::Number(_) => false,
            PostId::Text(text) => text.trim().is_empty(),
        }
    }
}

// `5` and `"5"` name the same post; `"05"` and `"+5"` do not.
impl PartialEq for PostId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PostId::Number(a), PostId::Number(b)) => a == b,
            (PostId::Text(a), PostId::Text(b)) => a == b,
            (PostId::Number(n), PostId::Text(s)) | (PostId::Text(s), PostId::Number(n)) => {
                *s == n.to_string()
            }
        }
    }
}

impl Eq for PostId {}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{n}"),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for PostId {
    fn from(value: i64) -> Self {
        PostId::Number(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        PostId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("post id must not be empty")]
pub struct ParsePostIdError;

impl FromStr for PostId {
    type Err = ParsePostIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParsePostIdError);
        }
        match trimmed.parse::<i64>() {
            Ok(n) if n.to_string() == trimmed => Ok(PostId::Number(n)),
            _ => Ok(PostId::Text(trimmed.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "modifiedAt", default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub liked: bool,
    /// Everything else the server stores (title, body, ...), kept verbatim.
    #[serde(flatten)]
    pub fields: PostFields,
}

impl Post {
    pub fn title(&self) -> Option<&str> {
        self.text_field("title")
    }

    pub fn body(&self) -> Option<&str> {
        self.text_field("body")
    }

    pub fn text_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn created(&self) -> Option<OffsetDateTime> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Parse a wire timestamp: RFC 3339, or a bare date taken as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Order newest first by `createdAt`. Stable; posts without a readable
/// timestamp sink to the end.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created().cmp(&a.created()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(value: Value) -> Post {
        serde_json::from_value(value).expect("valid post")
    }

    #[test]
    fn numeric_and_textual_ids_compare_equal() {
        assert_eq!(PostId::Number(5), PostId::from("5"));
        assert_eq!(PostId::from("abc"), PostId::from("abc"));
        assert_ne!(PostId::Number(5), PostId::from("05x"));
    }

    #[test]
    fn non_canonical_numerals_are_distinct_ids() {
        let five = PostId::Number(5);
        let padded = PostId::from("05");
        let text_five = PostId::from("5");

        assert_ne!(padded, five);
        assert_eq!(five, text_five);
        assert_ne!(padded, text_five);
        assert_ne!(PostId::from("+5"), five);
        assert_ne!(PostId::from("-0"), PostId::Number(0));
    }

    #[test]
    fn id_from_str_prefers_numbers() {
        assert_eq!("42".parse::<PostId>(), Ok(PostId::Number(42)));
        assert!(matches!(
            "65f0c0ffee".parse::<PostId>(),
            Ok(PostId::Text(ref s)) if s == "65f0c0ffee"
        ));
        assert_eq!("-3".parse::<PostId>(), Ok(PostId::Number(-3)));
        assert_eq!("  ".parse::<PostId>(), Err(ParsePostIdError));
        for padded in ["007", "+5", "0412", "-0"] {
            assert!(
                matches!(padded.parse::<PostId>(), Ok(PostId::Text(ref s)) if s == padded),
                "{padded} should stay textual"
            );
        }
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = json!({
            "id": "a1",
            "title": "Hello",
            "body": "World",
            "tags": ["x"],
            "createdAt": "2024-01-01T00:00:00Z",
            "liked": true
        });
        let parsed = post(raw.clone());
        assert_eq!(parsed.title(), Some("Hello"));
        assert_eq!(parsed.body(), Some("World"));
        assert!(parsed.liked);
        assert_eq!(serde_json::to_value(&parsed).expect("serialize"), raw);
    }

    #[test]
    fn liked_defaults_to_false() {
        let parsed = post(json!({ "id": 1 }));
        assert!(!parsed.liked);
        assert!(parsed.created_at.is_none());
    }

    #[test]
    fn null_id_is_rejected() {
        let err = serde_json::from_value::<Post>(json!({ "id": null, "title": "x" }));
        assert!(err.is_err());
        let err = serde_json::from_value::<Post>(json!({ "title": "x" }));
        assert!(err.is_err());
    }

    #[test]
    fn timestamps_accept_rfc3339_and_plain_dates() {
        assert!(parse_timestamp("2024-02-01T10:30:00.123Z").is_some());
        assert!(parse_timestamp("2024-02-01T10:30:00+02:00").is_some());
        let date = parse_timestamp("2024-02-01").expect("date only");
        assert_eq!(date.hour(), 0);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn sorting_puts_newest_first_and_unreadable_last() {
        let mut posts = vec![
            post(json!({ "id": 1, "createdAt": "2024-01-01T00:00:00Z" })),
            post(json!({ "id": 2 })),
            post(json!({ "id": 3, "createdAt": "2024-03-01T00:00:00Z" })),
            post(json!({ "id": 4, "createdAt": "2024-02-01" })),
        ];
        sort_newest_first(&mut posts);
        let ids: Vec<String> = posts.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, ["3", "4", "1", "2"]);
    }

    #[test]
    fn sorting_is_stable_for_equal_timestamps() {
        let mut posts = vec![
            post(json!({ "id": "b", "createdAt": "2024-01-01T00:00:00Z" })),
            post(json!({ "id": "a", "createdAt": "2024-01-01T00:00:00Z" })),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(posts[0].id, PostId::from("b"));
    }
}

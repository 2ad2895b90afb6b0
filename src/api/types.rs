use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Video {
    pub fn created_at_ts(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub video_id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub user_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
}

impl Comment {
    pub fn created_at_ts(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }
}

/// Body of `POST /videos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVideo {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
}

/// Body of `PUT /videos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoUpdate {
    pub video_id: String,
    pub title: String,
    pub description: String,
}

/// Body of `POST /videos/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub video_id: String,
    pub user_id: String,
    pub content: String,
}

/// `GET /videos` answers either with `{"videos": [...]}` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum VideoListResponse {
    Bare(Vec<Video>),
    Wrapped {
        #[serde(default)]
        videos: Option<Vec<Video>>,
    },
}

impl VideoListResponse {
    pub fn into_videos(self) -> Vec<Video> {
        match self {
            VideoListResponse::Bare(videos) => videos,
            VideoListResponse::Wrapped { videos } => videos.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
pub struct CommentListResponse {
    #[serde(default)]
    pub comments: Option<Vec<Comment>>,
}

/// Confirmation payload of a mutation. The server shape is loose, so the raw
/// JSON is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Ack(pub Value);

impl Ack {
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(ts) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(ts);
    }
    // Naive timestamps are what the backend stores; they are UTC.
    let normalized = trimmed.replacen(' ', "T", 1);
    let naive = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    PrimitiveDateTime::parse(&normalized, naive)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.unwrap_or_default())
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or numeric id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn video_ids_accept_numbers() {
        let video: Video = serde_json::from_value(json!({
            "id": 42,
            "user_id": "jane_doe",
            "title": "Intro",
            "description": "First lecture",
            "video_url": "https://cdn.example.com/intro.mp4",
            "created_at": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(video.id, "42");
        assert_eq!(video.thumbnail_url, None);
        assert!(video.created_at_ts().is_some());
    }

    #[test]
    fn list_response_accepts_both_shapes() {
        let wrapped: VideoListResponse = serde_json::from_value(json!({
            "videos": [{"id": "a", "title": "A"}]
        }))
        .unwrap();
        assert_eq!(wrapped.into_videos().len(), 1);

        let bare: VideoListResponse =
            serde_json::from_value(json!([{"id": "a", "title": "A"}, {"id": "b", "title": "B"}]))
                .unwrap();
        assert_eq!(bare.into_videos().len(), 2);

        let empty: VideoListResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_videos().is_empty());
    }

    #[test]
    fn missing_comments_key_is_empty() {
        let resp: CommentListResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.comments.unwrap_or_default().is_empty());
    }

    #[test]
    fn comment_without_author_deserializes() {
        let comment: Comment = serde_json::from_value(json!({
            "id": 7, "video_id": 3, "user_id": null, "content": "hi"
        }))
        .unwrap();
        assert_eq!(comment.user_id, None);
        assert_eq!(comment.video_id, "3");
    }

    #[test]
    fn parses_naive_and_offset_timestamps() {
        let naive = parse_timestamp("2024-01-15T10:30:00.123456").unwrap();
        let spaced = parse_timestamp("2024-01-15 10:30:00").unwrap();
        let offset = parse_timestamp("2024-01-15T10:30:00+00:00").unwrap();
        assert_eq!(naive.unix_timestamp(), offset.unix_timestamp());
        assert_eq!(spaced, offset);
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("  ").is_none());
    }
}

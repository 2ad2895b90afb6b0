use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::Video;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    Title,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Newest, SortMode::Oldest, SortMode::Title];

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Newest => "Newest First",
            SortMode::Oldest => "Oldest First",
            SortMode::Title => "Title (A-Z)",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::Title => "title",
        })
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "title" => Ok(SortMode::Title),
            other => Err(format!(
                "unknown sort '{other}' (expected newest, oldest or title)"
            )),
        }
    }
}

/// Case-insensitive substring match on title or description. A blank query
/// matches everything.
pub fn matches_query(video: &Video, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    video.title.to_lowercase().contains(&needle)
        || video.description.to_lowercase().contains(&needle)
}

pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable in-place sort. Unparseable timestamps count as the oldest.
pub fn sort_videos(videos: &mut [Video], mode: SortMode) {
    match mode {
        SortMode::Title => videos.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortMode::Newest => videos.sort_by_cached_key(|v| std::cmp::Reverse(created_key(v))),
        SortMode::Oldest => videos.sort_by_cached_key(created_key),
    }
}

fn created_key(video: &Video) -> i128 {
    video
        .created_at_ts()
        .map(|ts| ts.unix_timestamp_nanos())
        .unwrap_or(i128::MIN)
}

pub fn apply_view(videos: &[Video], query: &str, mode: SortMode) -> Vec<Video> {
    let mut visible: Vec<Video> = videos
        .iter()
        .filter(|video| matches_query(video, query))
        .cloned()
        .collect();
    sort_videos(&mut visible, mode);
    visible
}

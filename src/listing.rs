use crate::api::Video;
use crate::filters::{self, SortMode};
use crate::identity::Identity;

pub const VIDEOS_LOAD_FAILED: &str = "Failed to load videos. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyState {
    /// The user owns no videos at all.
    NoVideos,
    /// Videos exist but none match the query.
    NoMatches,
}

impl EmptyState {
    pub fn heading(self) -> &'static str {
        match self {
            EmptyState::NoVideos => "No videos yet",
            EmptyState::NoMatches => "No videos found",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            EmptyState::NoVideos => "Create your first video to get started!",
            EmptyState::NoMatches => "Try adjusting your search or filters",
        }
    }
}

/// A fetch the caller must run: list `user_id`'s videos, then report back
/// with `generation`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListFetch {
    pub generation: u64,
    pub user_id: String,
}

/// Raw videos of the signed-in user plus the filtered/sorted view.
#[derive(Debug)]
pub struct VideoListState {
    videos: Vec<Video>,
    visible: Vec<Video>,
    query: String,
    sort: SortMode,
    status: ListStatus,
    generation: u64,
    loaded_refresh: Option<u64>,
}

impl Default for VideoListState {
    fn default() -> Self {
        Self {
            videos: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            sort: SortMode::default(),
            status: ListStatus::Idle,
            generation: 0,
            loaded_refresh: None,
        }
    }
}

impl VideoListState {
    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn visible(&self) -> &[Video] {
        &self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        if self.sort != sort {
            self.sort = sort;
            self.recompute();
        }
    }

    /// Re-derives the visible list. Call after editing the query in place.
    pub fn recompute(&mut self) {
        self.visible = filters::apply_view(&self.videos, &self.query, self.sort);
    }

    /// Whether the list has not been fetched for `refresh_token` yet.
    pub fn needs_load(&self, refresh_token: u64) -> bool {
        self.loaded_refresh != Some(refresh_token)
    }

    /// Forces the next [`Self::needs_load`] to report true.
    pub fn remount(&mut self) {
        self.loaded_refresh = None;
    }

    /// Starts a load for `refresh_token`. Without an identity nothing is
    /// fetched and the list settles as empty right away.
    pub fn begin_load(
        &mut self,
        identity: Option<&Identity>,
        refresh_token: u64,
    ) -> Option<ListFetch> {
        self.generation += 1;
        self.loaded_refresh = Some(refresh_token);
        let Some(identity) = identity else {
            self.videos.clear();
            self.status = ListStatus::Ready;
            self.recompute();
            return None;
        };
        self.status = ListStatus::Loading;
        Some(ListFetch {
            generation: self.generation,
            user_id: identity.as_str().to_owned(),
        })
    }

    /// Applies a finished fetch; stale generations are ignored and `false` is
    /// returned.
    pub fn finish_load(&mut self, generation: u64, result: Result<Vec<Video>, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        match result {
            Ok(videos) => {
                self.videos = videos;
                self.status = ListStatus::Ready;
            }
            Err(_) => {
                self.status = ListStatus::Failed(VIDEOS_LOAD_FAILED.to_owned());
            }
        }
        self.recompute();
        true
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.status != ListStatus::Ready {
            return None;
        }
        if self.videos.is_empty() {
            Some(EmptyState::NoVideos)
        } else if self.visible.is_empty() {
            Some(EmptyState::NoMatches)
        } else {
            None
        }
    }

    pub fn results_summary(&self) -> Option<String> {
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }
        let count = self.visible.len();
        Some(format!(
            "Found {} result{} for \"{}\"",
            count,
            if count == 1 { "" } else { "s" },
            query
        ))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::api::{Comment, NewComment, Video};
use crate::forms::{FormError, MAX_COMMENT_CHARS};
use crate::identity::Identity;

pub const COMMENTS_LOAD_FAILED: &str = "Failed to load comments";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackSpeed {
    Half,
    #[default]
    Normal,
    OneAndHalf,
    Double,
}

impl PlaybackSpeed {
    pub const ALL: [PlaybackSpeed; 4] = [
        PlaybackSpeed::Half,
        PlaybackSpeed::Normal,
        PlaybackSpeed::OneAndHalf,
        PlaybackSpeed::Double,
    ];

    pub fn multiplier(self) -> f32 {
        match self {
            PlaybackSpeed::Half => 0.5,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::OneAndHalf => 1.5,
            PlaybackSpeed::Double => 2.0,
        }
    }

    pub fn label(self) -> String {
        match self {
            PlaybackSpeed::Normal => "1x (Normal)".to_owned(),
            other => format!("{}x", other.multiplier()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommentsStatus {
    Loading,
    Ready,
    Failed(String),
}

/// A comment that has been shown locally but not yet confirmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingComment {
    pub temp_id: String,
    pub request: NewComment,
}

/// Comments of the open video: load generations, the draft, and optimistic
/// inserts.
#[derive(Debug)]
pub struct CommentThread {
    video_id: Option<String>,
    comments: Vec<Comment>,
    status: CommentsStatus,
    generation: u64,
    pub draft: String,
    error: Option<String>,
    submitting: bool,
}

impl Default for CommentThread {
    fn default() -> Self {
        Self {
            video_id: None,
            comments: Vec::new(),
            status: CommentsStatus::Loading,
            generation: 0,
            draft: String::new(),
            error: None,
            submitting: false,
        }
    }
}

impl CommentThread {
    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn status(&self) -> &CommentsStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn header_label(&self) -> String {
        let count = self.comments.len();
        format!("{} Comment{}", count, if count == 1 { "" } else { "s" })
    }

    /// Starts a fresh load for `video_id` and returns its generation. Results
    /// from earlier generations are dropped by [`Self::finish_load`].
    pub fn begin_load(&mut self, video_id: &str) -> u64 {
        if self.video_id.as_deref() != Some(video_id) {
            self.draft.clear();
            self.error = None;
            self.submitting = false;
        }
        self.video_id = Some(video_id.to_owned());
        self.comments.clear();
        self.status = CommentsStatus::Loading;
        self.generation += 1;
        self.generation
    }

    pub fn finish_load(&mut self, generation: u64, result: Result<Vec<Comment>, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        match result {
            Ok(comments) => {
                self.comments = comments;
                self.status = CommentsStatus::Ready;
            }
            Err(_) => {
                self.status = CommentsStatus::Failed(COMMENTS_LOAD_FAILED.to_owned());
            }
        }
        true
    }

    /// Validates the draft and inserts a temporary comment at the top. The
    /// returned request must be sent; then call [`Self::confirm`] or
    /// [`Self::roll_back`] with its `temp_id`.
    pub fn begin_submit(
        &mut self,
        author: &Identity,
        now: OffsetDateTime,
    ) -> Result<PendingComment, FormError> {
        let content = self.draft.trim().to_owned();
        let validation = if content.is_empty() {
            Err(FormError::EmptyComment)
        } else if content.chars().count() > MAX_COMMENT_CHARS {
            Err(FormError::CommentTooLong)
        } else {
            Ok(())
        };
        if let Err(err) = validation {
            self.error = Some(err.to_string());
            return Err(err);
        }
        let Some(video_id) = self.video_id.clone() else {
            self.error = Some(FormError::NoVideo.to_string());
            return Err(FormError::NoVideo);
        };

        let temp_id = self.temp_id(now);
        self.comments.insert(
            0,
            Comment {
                id: temp_id.clone(),
                video_id: video_id.clone(),
                user_id: Some(author.as_str().to_owned()),
                content: content.clone(),
                created_at: now.format(&Rfc3339).unwrap_or_default(),
            },
        );
        self.draft.clear();
        self.error = None;
        self.submitting = true;

        Ok(PendingComment {
            temp_id,
            request: NewComment {
                video_id,
                user_id: author.as_str().to_owned(),
                content,
            },
        })
    }

    /// The temporary entry stays in place until the next load.
    pub fn confirm(&mut self) {
        self.submitting = false;
    }

    /// Removes the temporary comment and surfaces `message` inline.
    pub fn roll_back(&mut self, temp_id: &str, message: String) {
        self.comments.retain(|comment| comment.id != temp_id);
        self.error = Some(message);
        self.submitting = false;
    }

    pub fn cancel_draft(&mut self) {
        self.draft.clear();
        self.error = None;
    }

    fn temp_id(&self, now: OffsetDateTime) -> String {
        let millis = now.unix_timestamp_nanos() / 1_000_000;
        let base = format!("temp_{millis}");
        let mut candidate = base.clone();
        let mut counter = 2usize;
        while self.comments.iter().any(|c| c.id == candidate) {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }
        candidate
    }
}

/// Everything the player screen owns for the open video.
#[derive(Debug, Default)]
pub struct PlayerState {
    pub thread: CommentThread,
    pub speed: PlaybackSpeed,
    pub speed_menu_open: bool,
}

impl PlayerState {
    /// True when `video` is not the one whose comments are held.
    pub fn needs_load(&self, video: &Video) -> bool {
        self.thread.video_id() != Some(video.id.as_str())
    }

    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
        self.speed_menu_open = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn author() -> Identity {
        Identity::from_name("Jane", "Doe").unwrap()
    }

    fn comment(id: &str, content: &str) -> Comment {
        Comment {
            id: id.into(),
            video_id: "v1".into(),
            user_id: Some("sam_lee".into()),
            content: content.into(),
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    fn loaded_thread() -> CommentThread {
        let mut thread = CommentThread::default();
        let generation = thread.begin_load("v1");
        assert!(thread.finish_load(generation, Ok(vec![comment("c1", "Great intro")])));
        thread
    }

    #[test]
    fn empty_comment_is_rejected_without_insert() {
        let mut thread = loaded_thread();
        thread.draft = "   ".into();
        let result = thread.begin_submit(&author(), datetime!(2024-05-01 12:00 UTC));
        assert_eq!(result, Err(FormError::EmptyComment));
        assert_eq!(thread.error(), Some("Comment cannot be empty"));
        assert_eq!(thread.comments().len(), 1);
        assert!(!thread.is_submitting());
    }

    #[test]
    fn submit_inserts_temporary_comment_first() {
        let mut thread = loaded_thread();
        thread.draft = "  Thanks! ".into();
        let now = datetime!(2024-05-01 12:00 UTC);
        let pending = thread.begin_submit(&author(), now).unwrap();

        assert_eq!(pending.temp_id, format!("temp_{}", now.unix_timestamp() * 1000));
        assert_eq!(pending.request.content, "Thanks!");
        assert_eq!(pending.request.user_id, "jane_doe");
        assert_eq!(pending.request.video_id, "v1");
        assert_eq!(thread.comments()[0].id, pending.temp_id);
        assert_eq!(thread.comments().len(), 2);
        assert!(thread.draft.is_empty());
        assert!(thread.is_submitting());

        thread.confirm();
        assert!(!thread.is_submitting());
        assert_eq!(thread.comments().len(), 2);
    }

    #[test]
    fn failed_submit_rolls_back() {
        let mut thread = loaded_thread();
        thread.draft = "First!".into();
        let pending = thread
            .begin_submit(&author(), datetime!(2024-05-01 12:00 UTC))
            .unwrap();
        thread.roll_back(&pending.temp_id, "Video not found".into());

        assert!(thread.comments().iter().all(|c| c.id != pending.temp_id));
        assert_eq!(thread.comments().len(), 1);
        assert_eq!(thread.error(), Some("Video not found"));
        assert!(!thread.is_submitting());
    }

    #[test]
    fn temp_ids_stay_unique_within_one_millisecond() {
        let mut thread = loaded_thread();
        let now = datetime!(2024-05-01 12:00 UTC);
        thread.draft = "one".into();
        let first = thread.begin_submit(&author(), now).unwrap();
        thread.draft = "two".into();
        let second = thread.begin_submit(&author(), now).unwrap();
        assert_ne!(first.temp_id, second.temp_id);
    }

    #[test]
    fn stale_loads_are_ignored() {
        let mut thread = CommentThread::default();
        let first = thread.begin_load("v1");
        let second = thread.begin_load("v2");
        assert!(!thread.finish_load(first, Ok(vec![comment("old", "stale")])));
        assert!(thread.comments().is_empty());
        assert_eq!(thread.status(), &CommentsStatus::Loading);

        assert!(thread.finish_load(second, Ok(vec![])));
        assert_eq!(thread.status(), &CommentsStatus::Ready);
        assert_eq!(thread.video_id(), Some("v2"));
        assert_eq!(thread.header_label(), "0 Comments");
    }

    #[test]
    fn load_failure_uses_fixed_message() {
        let mut thread = CommentThread::default();
        let generation = thread.begin_load("v1");
        thread.finish_load(generation, Err("boom".into()));
        assert_eq!(
            thread.status(),
            &CommentsStatus::Failed(COMMENTS_LOAD_FAILED.to_owned())
        );
    }

    #[test]
    fn speed_labels() {
        assert_eq!(PlaybackSpeed::Normal.label(), "1x (Normal)");
        assert_eq!(PlaybackSpeed::Half.label(), "0.5x");
        assert_eq!(PlaybackSpeed::Double.label(), "2x");
        let mut player = PlayerState {
            speed_menu_open: true,
            ..Default::default()
        };
        player.set_speed(PlaybackSpeed::OneAndHalf);
        assert_eq!(player.speed.multiplier(), 1.5);
        assert!(!player.speed_menu_open);
    }
}

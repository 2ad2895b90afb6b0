use reqwest::Url;

use crate::api::{NewVideo, Video, VideoUpdate};
use crate::identity::Identity;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_COMMENT_CHARS: usize = 500;

/// Client-side validation failures. Nothing that fails here reaches the
/// network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("All fields are required")]
    MissingUploadFields,
    #[error("Title and description are required")]
    MissingEditFields,
    #[error("No changes made")]
    NoChanges,
    #[error("Title must be at most {} characters", MAX_TITLE_CHARS)]
    TitleTooLong,
    #[error("Description must be at most {} characters", MAX_DESCRIPTION_CHARS)]
    DescriptionTooLong,
    #[error("Enter a valid video URL")]
    InvalidUrl,
    #[error("Comment cannot be empty")]
    EmptyComment,
    #[error("Comment must be at most {} characters", MAX_COMMENT_CHARS)]
    CommentTooLong,
    #[error("First and last name are required")]
    MissingName,
    #[error("No video selected")]
    NoVideo,
}

/// In-flight flag plus the inline error shown under a form heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitState {
    pub submitting: bool,
    pub error: Option<String>,
}

impl SubmitState {
    fn reject(&mut self, err: &FormError) {
        self.submitting = false;
        self.error = Some(err.to_string());
    }

    fn start(&mut self) {
        self.submitting = true;
        self.error = None;
    }

    fn finish(&mut self, result: &Result<(), String>) {
        self.submitting = false;
        self.error = result.as_ref().err().cloned();
    }
}

fn check_lengths(title: &str, description: &str) -> Result<(), FormError> {
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(FormError::TitleTooLong);
    }
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(FormError::DescriptionTooLong);
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub state: SubmitState,
}

impl UploadForm {
    pub fn validate(&self, owner: &Identity) -> Result<NewVideo, FormError> {
        let title = self.title.trim();
        let description = self.description.trim();
        let video_url = self.video_url.trim();
        if title.is_empty() || description.is_empty() || video_url.is_empty() {
            return Err(FormError::MissingUploadFields);
        }
        check_lengths(title, description)?;
        if Url::parse(video_url).is_err() {
            return Err(FormError::InvalidUrl);
        }
        Ok(NewVideo {
            user_id: owner.as_str().to_owned(),
            title: title.to_owned(),
            description: description.to_owned(),
            video_url: video_url.to_owned(),
        })
    }

    /// Validates and marks the form busy. On error the inline message is set.
    pub fn begin_submit(&mut self, owner: &Identity) -> Result<NewVideo, FormError> {
        match self.validate(owner) {
            Ok(payload) => {
                self.state.start();
                Ok(payload)
            }
            Err(err) => {
                self.state.reject(&err);
                Err(err)
            }
        }
    }

    pub fn finish_submit(&mut self, result: Result<(), String>) -> bool {
        self.state.finish(&result);
        result.is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct EditForm {
    original: Video,
    pub title: String,
    pub description: String,
    pub state: SubmitState,
}

impl EditForm {
    pub fn new(video: &Video) -> Self {
        Self {
            original: video.clone(),
            title: video.title.clone(),
            description: video.description.clone(),
            state: SubmitState::default(),
        }
    }

    pub fn original(&self) -> &Video {
        &self.original
    }

    pub fn validate(&self) -> Result<VideoUpdate, FormError> {
        let title = self.title.trim();
        let description = self.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(FormError::MissingEditFields);
        }
        if title == self.original.title.trim() && description == self.original.description.trim()
        {
            return Err(FormError::NoChanges);
        }
        check_lengths(title, description)?;
        Ok(VideoUpdate {
            video_id: self.original.id.clone(),
            title: title.to_owned(),
            description: description.to_owned(),
        })
    }

    pub fn begin_submit(&mut self) -> Result<VideoUpdate, FormError> {
        match self.validate() {
            Ok(update) => {
                self.state.start();
                Ok(update)
            }
            Err(err) => {
                self.state.reject(&err);
                Err(err)
            }
        }
    }

    /// Returns the updated record on success so the caller can swap it in
    /// without a re-fetch.
    pub fn finish_submit(
        &mut self,
        update: &VideoUpdate,
        result: Result<(), String>,
    ) -> Option<Video> {
        self.state.finish(&result);
        result.ok().map(|()| Video {
            title: update.title.clone(),
            description: update.description.clone(),
            ..self.original.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Identity {
        Identity::from_name("Jane", "Doe").unwrap()
    }

    fn video() -> Video {
        Video {
            id: "v1".into(),
            user_id: "jane_doe".into(),
            title: "Ownership".into(),
            description: "Moves and borrows".into(),
            video_url: "https://cdn.example.com/v1.mp4".into(),
            thumbnail_url: Some("https://cdn.example.com/v1.jpg".into()),
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn upload_requires_every_field() {
        let mut form = UploadForm {
            title: "Lifetimes".into(),
            description: "  ".into(),
            video_url: "https://cdn.example.com/l.mp4".into(),
            ..Default::default()
        };
        assert_eq!(
            form.begin_submit(&owner()),
            Err(FormError::MissingUploadFields)
        );
        assert_eq!(form.state.error.as_deref(), Some("All fields are required"));
        assert!(!form.state.submitting);
    }

    #[test]
    fn upload_trims_and_attaches_owner() {
        let mut form = UploadForm {
            title: "  Lifetimes ".into(),
            description: "Where 'a comes from".into(),
            video_url: " https://cdn.example.com/l.mp4 ".into(),
            ..Default::default()
        };
        let payload = form.begin_submit(&owner()).unwrap();
        assert_eq!(payload.user_id, "jane_doe");
        assert_eq!(payload.title, "Lifetimes");
        assert_eq!(payload.video_url, "https://cdn.example.com/l.mp4");
        assert!(form.state.submitting);

        assert!(!form.finish_submit(Err("Something went wrong".into())));
        assert_eq!(form.state.error.as_deref(), Some("Something went wrong"));
        assert!(!form.state.submitting);
    }

    #[test]
    fn upload_rejects_bad_url_and_long_title() {
        let form = UploadForm {
            title: "x".repeat(MAX_TITLE_CHARS + 1),
            description: "d".into(),
            video_url: "https://cdn.example.com/l.mp4".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(&owner()), Err(FormError::TitleTooLong));

        let form = UploadForm {
            title: "t".into(),
            description: "d".into(),
            video_url: "not a url".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(&owner()), Err(FormError::InvalidUrl));
    }

    #[test]
    fn edit_without_changes_is_rejected() {
        let mut form = EditForm::new(&video());
        assert_eq!(form.begin_submit(), Err(FormError::NoChanges));
        assert_eq!(form.state.error.as_deref(), Some("No changes made"));

        form.title = "Ownership  ".into();
        assert_eq!(form.validate(), Err(FormError::NoChanges));
    }

    #[test]
    fn edit_requires_title_and_description() {
        let mut form = EditForm::new(&video());
        form.description.clear();
        assert_eq!(form.validate(), Err(FormError::MissingEditFields));
    }

    #[test]
    fn edit_success_returns_patched_video() {
        let mut form = EditForm::new(&video());
        form.description = "Moves, borrows and lifetimes".into();
        let update = form.begin_submit().unwrap();
        assert_eq!(update.video_id, "v1");
        let updated = form.finish_submit(&update, Ok(())).unwrap();
        assert_eq!(updated.description, "Moves, borrows and lifetimes");
        assert_eq!(updated.title, "Ownership");
        assert_eq!(updated.thumbnail_url, video().thumbnail_url);
        assert!(form.state.error.is_none());
    }
}

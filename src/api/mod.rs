mod client;
mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, GENERIC_ERROR_MESSAGE, extract_message};
pub use types::{Ack, Comment, NewComment, NewVideo, Video, VideoUpdate};

/// Hosted EduWatch API used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://take-home-assessment-423502.uc.r.appspot.com/api";

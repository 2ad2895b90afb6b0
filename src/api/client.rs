use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{ApiError, extract_message};
use super::types::{
    Ack, Comment, CommentListResponse, NewComment, NewVideo, Video, VideoListResponse,
    VideoUpdate,
};

/// Thin async wrapper over the EduWatch REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_video(&self, video: &NewVideo) -> Result<Ack, ApiError> {
        self.send_json(Method::POST, "/videos", video).await
    }

    pub async fn list_user_videos(&self, user_id: &str) -> Result<Vec<Video>, ApiError> {
        let path = format!("/videos?user_id={}", urlencoding::encode(user_id));
        let parsed: VideoListResponse = self.get(&path).await?;
        Ok(parsed.into_videos())
    }

    pub async fn get_video(&self, video_id: &str) -> Result<Video, ApiError> {
        let path = format!("/videos/single?video_id={}", urlencoding::encode(video_id));
        self.get(&path).await
    }

    pub async fn update_video(&self, update: &VideoUpdate) -> Result<Ack, ApiError> {
        self.send_json(Method::PUT, "/videos", update).await
    }

    pub async fn create_comment(&self, comment: &NewComment) -> Result<Ack, ApiError> {
        self.send_json(Method::POST, "/videos/comments", comment).await
    }

    pub async fn list_comments(&self, video_id: &str) -> Result<Vec<Comment>, ApiError> {
        let path = format!("/videos/comments?video_id={}", urlencoding::encode(video_id));
        let parsed: CommentListResponse = self.get(&path).await?;
        Ok(parsed.comments.unwrap_or_default())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(method = "GET", path, "api request");
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|err| transport_failure("GET", path, err))?;
        let bytes = read_success(resp, "GET", path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> Result<Ack, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let verb = method.as_str().to_owned();
        debug!(method = %verb, path, "api request");
        let resp = self
            .http
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|err| transport_failure(&verb, path, err))?;
        let bytes = read_success(resp, &verb, path).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Ack(Value::Null));
        }
        Ok(Ack(serde_json::from_slice(&bytes)?))
    }
}

fn transport_failure(method: &str, path: &str, err: reqwest::Error) -> ApiError {
    warn!(method, path, error = %err, "api transport failure");
    ApiError::Transport(err)
}

async fn read_success(resp: Response, method: &str, path: &str) -> Result<Vec<u8>, ApiError> {
    let status = resp.status();
    let bytes = resp
        .bytes()
        .await
        .map_err(|err| transport_failure(method, path, err))?;
    if !status.is_success() {
        let message = extract_message(&bytes);
        warn!(
            method,
            path,
            status = status.as_u16(),
            reason = %message,
            "api request failed"
        );
        return Err(ApiError::Status { status, message });
    }
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new(" http://localhost:8000/api/ ");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/videos"), "http://localhost:8000/api/videos");
    }
}

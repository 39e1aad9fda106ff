//! HTTP access to the video backend.
//!
//! Every call goes through [`dispatch`], which turns any response, success or
//! not, into a [`Reply`] and any transport failure into
//! [`ApiError::Transport`]. Typed endpoints sit on top in [`ApiClient`].

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{Comment, Credentials, NewVideo, Registration, Session, Video, VideoMetadata};
use futures_util::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const UPLOADED: &str = "Video uploaded successfully!";
pub const UPDATED: &str = "Video updated successfully";

/// A backend call that has been prepared but not yet awaited.
pub type Pending<T> = BoxFuture<'static, ApiResult<T>>;

/// Status and parsed body of a response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Human-readable failure text carried by the body.
    pub fn error_message(&self) -> String {
        let from_body = match &self.body {
            Value::Object(map) => map
                .get("error")
                .or_else(|| map.get("message"))
                .and_then(Value::as_str)
                .map(String::from),
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        };
        from_body.unwrap_or_else(|| {
            self.status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
    }

    pub fn into_result<T: DeserializeOwned>(self) -> ApiResult<T> {
        if !self.is_success() {
            return Err(self.rejection());
        }
        serde_json::from_value(self.body).map_err(|e| {
            log::warn!("unexpected response body: {}", e);
            ApiError::Decode(e.to_string())
        })
    }

    pub fn into_unit(self) -> ApiResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self.rejection())
        }
    }

    /// `message` from a success body, or `default`.
    pub fn into_message(self, default: &str) -> ApiResult<String> {
        if !self.is_success() {
            return Err(self.rejection());
        }
        let message = match &self.body {
            Value::Object(map) => map.get("message").and_then(Value::as_str).map(String::from),
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        };
        Ok(message.unwrap_or_else(|| default.to_string()))
    }

    fn rejection(&self) -> ApiError {
        ApiError::Rejected {
            status: self.status.as_u16(),
            message: self.error_message(),
        }
    }
}

/// Sends one request and parses whatever body comes back. A body that is not
/// JSON is kept as a string value; an empty body becomes `null`.
pub async fn dispatch(request: RequestBuilder) -> ApiResult<Reply> {
    let response = request.send().await?;
    let status = response.status();
    log::debug!("{} {}", status.as_u16(), response.url());

    let text = response.text().await?;
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    Ok(Reply { status, body })
}

fn pending<T, F>(request: RequestBuilder, finish: F) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce(Reply) -> ApiResult<T> + Send + 'static,
{
    Box::pin(async move { finish(dispatch(request).await?) })
}

/// The backend surface the pages depend on.
pub trait Backend: Send + Sync {
    fn list_videos(&self) -> Pending<Vec<Video>>;
    fn get_video(&self, id: &str) -> Pending<Video>;
    /// Success is decided by status; the body only contributes a message.
    fn upload_video(&self, upload: NewVideo) -> Pending<String>;
    fn update_video(&self, id: &str, metadata: VideoMetadata) -> Pending<String>;
    fn delete_video(&self, id: &str) -> Pending<()>;
    fn user_videos(&self, email: &str) -> Pending<Vec<Video>>;
    fn comments(&self, id: &str) -> Pending<Vec<Comment>>;
    fn add_comment(&self, id: &str, user: &str, text: &str) -> Pending<Video>;
    fn like(&self, id: &str, user: &str) -> Pending<Video>;
    fn unlike(&self, id: &str, user: &str) -> Pending<Video>;
    fn register(&self, registration: Registration) -> Pending<String>;
    fn login(&self, credentials: Credentials) -> Pending<Session>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(ApiClient {
            http: builder.build()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn video_url(&self, id: &str, suffix: &str) -> String {
        self.url(&format!("/videos/{}{}", urlencoding::encode(id), suffix))
    }

    pub fn update_request(&self, id: &str, metadata: &VideoMetadata) -> RequestBuilder {
        self.http.put(self.video_url(id, "")).json(metadata)
    }

    pub fn upload_request(&self, upload: &NewVideo, bytes: Vec<u8>) -> RequestBuilder {
        let file_name = upload
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("title", upload.title.clone())
            .text("description", upload.description.clone())
            .text("tags", upload.tags.clone())
            .text("uploadedBy", upload.uploaded_by.clone());
        self.http.post(self.url("/videos/upload")).multipart(form)
    }

    pub fn reaction_request(&self, id: &str, user: &str, liked: bool) -> RequestBuilder {
        let action = if liked { "/like" } else { "/unlike" };
        self.http
            .post(self.video_url(id, action))
            .query(&[("userId", user)])
    }

    pub fn comment_request(&self, id: &str, user: &str, text: &str) -> RequestBuilder {
        self.http
            .post(self.video_url(id, "/comment"))
            .query(&[("userId", user), ("text", text)])
    }
}

impl Backend for ApiClient {
    fn list_videos(&self) -> Pending<Vec<Video>> {
        pending(self.http.get(self.url("/videos")), Reply::into_result)
    }

    fn get_video(&self, id: &str) -> Pending<Video> {
        pending(self.http.get(self.video_url(id, "")), Reply::into_result)
    }

    fn upload_video(&self, upload: NewVideo) -> Pending<String> {
        let client = self.clone();
        Box::pin(async move {
            let bytes = tokio::fs::read(&upload.file)
                .await
                .map_err(|e| ApiError::File {
                    path: upload.file.display().to_string(),
                    reason: e.to_string(),
                })?;
            log::info!("uploading {} ({} bytes)", upload.file.display(), bytes.len());
            dispatch(client.upload_request(&upload, bytes))
                .await?
                .into_message(UPLOADED)
        })
    }

    fn update_video(&self, id: &str, metadata: VideoMetadata) -> Pending<String> {
        pending(self.update_request(id, &metadata), |reply| reply.into_message(UPDATED))
    }

    fn delete_video(&self, id: &str) -> Pending<()> {
        pending(self.http.delete(self.video_url(id, "")), Reply::into_unit)
    }

    fn user_videos(&self, email: &str) -> Pending<Vec<Video>> {
        let url = self.url(&format!("/videos/user/{}", urlencoding::encode(email)));
        pending(self.http.get(url), Reply::into_result)
    }

    fn comments(&self, id: &str) -> Pending<Vec<Comment>> {
        pending(self.http.get(self.video_url(id, "/comments")), Reply::into_result)
    }

    fn add_comment(&self, id: &str, user: &str, text: &str) -> Pending<Video> {
        pending(self.comment_request(id, user, text), Reply::into_result)
    }

    fn like(&self, id: &str, user: &str) -> Pending<Video> {
        pending(self.reaction_request(id, user, true), Reply::into_result)
    }

    fn unlike(&self, id: &str, user: &str) -> Pending<Video> {
        pending(self.reaction_request(id, user, false), Reply::into_result)
    }

    fn register(&self, registration: Registration) -> Pending<String> {
        let request = self.http.post(self.url("/auth/register")).json(&registration);
        pending(request, |reply| reply.into_message("Registration successful"))
    }

    fn login(&self, credentials: Credentials) -> Pending<Session> {
        let request = self.http.post(self.url("/auth/login")).json(&credentials);
        pending(request, Reply::into_result)
    }
}

//! In-process stand-in for the backend, used by the page tests.

use crate::client::{Backend, Pending, UPDATED, UPLOADED};
use crate::error::{ApiError, ApiResult};
use crate::models::{Comment, Credentials, NewVideo, Registration, Session, Video, VideoMetadata};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn video(id: &str, uploaded_by: &str) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {}", id),
        description: String::new(),
        tags: vec![],
        video_url: format!("https://cdn.test/{}.mp4", id),
        public_id: None,
        uploaded_by: uploaded_by.to_string(),
        uploaded_at: Some(Utc::now()),
        likes: vec![],
        comments: vec![],
        views: None,
    }
}

pub fn comment(user: &str, text: &str) -> Comment {
    Comment {
        user_id: user.to_string(),
        text: text.to_string(),
        created_at: Some(Utc::now()),
    }
}

#[derive(Default)]
pub struct FakeBackend {
    videos: Mutex<Vec<Video>>,
    users: Mutex<HashMap<String, (String, String)>>,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<ApiError>>,
    next_id: Mutex<u32>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_videos(videos: Vec<Video>) -> Self {
        let backend = Self::new();
        *backend.videos.lock().unwrap() = videos;
        backend
    }

    pub fn with_user(self, email: &str, name: &str, password: &str) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(email.to_string(), (name.to_string(), password.to_string()));
        self
    }

    /// Every following call fails with `error`.
    pub fn fail_with(&self, error: ApiError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn videos(&self) -> Vec<Video> {
        self.videos.lock().unwrap().clone()
    }

    fn respond<T: Send + 'static>(
        &self,
        call: String,
        handle: impl FnOnce(&mut Vec<Video>) -> ApiResult<T>,
    ) -> Pending<T> {
        self.calls.lock().unwrap().push(call);
        let result = match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => handle(&mut *self.videos.lock().unwrap()),
        };
        Box::pin(async move { result })
    }

    fn with_video<T>(
        videos: &mut [Video],
        id: &str,
        f: impl FnOnce(&mut Video) -> T,
    ) -> ApiResult<T> {
        videos
            .iter_mut()
            .find(|v| v.id == id)
            .map(f)
            .ok_or_else(not_found)
    }
}

fn not_found() -> ApiError {
    ApiError::Rejected {
        status: 404,
        message: "Video not found".to_string(),
    }
}

impl Backend for FakeBackend {
    fn list_videos(&self) -> Pending<Vec<Video>> {
        self.respond("GET /videos".to_string(), |videos| Ok(videos.clone()))
    }

    fn get_video(&self, id: &str) -> Pending<Video> {
        let id = id.to_string();
        self.respond(format!("GET /videos/{}", id), move |videos| {
            Self::with_video(videos, &id, |v| v.clone())
        })
    }

    fn upload_video(&self, upload: NewVideo) -> Pending<String> {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("new{}", next)
        };
        self.respond("POST /videos/upload".to_string(), move |videos| {
            let mut created = video(&id, &upload.uploaded_by);
            created.title = upload.title;
            created.description = upload.description;
            created.tags = upload.tags.split(',').map(String::from).collect();
            videos.push(created);
            Ok(UPLOADED.to_string())
        })
    }

    fn update_video(&self, id: &str, metadata: VideoMetadata) -> Pending<String> {
        let id = id.to_string();
        self.respond(format!("PUT /videos/{}", id), move |videos| {
            Self::with_video(videos, &id, |v| {
                v.title = metadata.title;
                v.description = metadata.description;
                v.tags = metadata.tags;
                UPDATED.to_string()
            })
        })
    }

    fn delete_video(&self, id: &str) -> Pending<()> {
        let id = id.to_string();
        self.respond(format!("DELETE /videos/{}", id), move |videos| {
            let before = videos.len();
            videos.retain(|v| v.id != id);
            if videos.len() == before {
                Err(not_found())
            } else {
                Ok(())
            }
        })
    }

    fn user_videos(&self, email: &str) -> Pending<Vec<Video>> {
        let email = email.to_string();
        self.respond(format!("GET /videos/user/{}", email), move |videos| {
            Ok(videos
                .iter()
                .filter(|v| v.uploaded_by == email)
                .cloned()
                .collect())
        })
    }

    fn comments(&self, id: &str) -> Pending<Vec<Comment>> {
        let id = id.to_string();
        self.respond(format!("GET /videos/{}/comments", id), move |videos| {
            Self::with_video(videos, &id, |v| v.comments.clone())
        })
    }

    fn add_comment(&self, id: &str, user: &str, text: &str) -> Pending<Video> {
        let (id, user, text) = (id.to_string(), user.to_string(), text.to_string());
        self.respond(format!("POST /videos/{}/comment", id), move |videos| {
            Self::with_video(videos, &id, |v| {
                v.comments.push(comment(&user, &text));
                v.clone()
            })
        })
    }

    fn like(&self, id: &str, user: &str) -> Pending<Video> {
        let (id, user) = (id.to_string(), user.to_string());
        self.respond(format!("POST /videos/{}/like", id), move |videos| {
            Self::with_video(videos, &id, |v| {
                if !v.is_liked_by(&user) {
                    v.likes.push(user);
                }
                v.clone()
            })
        })
    }

    fn unlike(&self, id: &str, user: &str) -> Pending<Video> {
        let (id, user) = (id.to_string(), user.to_string());
        self.respond(format!("POST /videos/{}/unlike", id), move |videos| {
            Self::with_video(videos, &id, |v| {
                v.likes.retain(|l| *l != user);
                v.clone()
            })
        })
    }

    fn register(&self, registration: Registration) -> Pending<String> {
        let mut users = self.users.lock().unwrap();
        let result = if users.contains_key(&registration.email) {
            Err(ApiError::Rejected {
                status: 400,
                message: "Email already registered".to_string(),
            })
        } else {
            users.insert(
                registration.email.clone(),
                (registration.name.clone(), registration.password.clone()),
            );
            Ok("User registered successfully".to_string())
        };
        drop(users);
        self.respond("POST /auth/register".to_string(), move |_| result)
    }

    fn login(&self, credentials: Credentials) -> Pending<Session> {
        let result = match self.users.lock().unwrap().get(&credentials.email) {
            Some((name, password)) if *password == credentials.password => Ok(Session {
                email: credentials.email.clone(),
                name: Some(name.clone()),
                bio: None,
                website: None,
            }),
            _ => Err(ApiError::Rejected {
                status: 401,
                message: "Invalid credentials".to_string(),
            }),
        };
        self.respond("POST /auth/login".to_string(), move |_| result)
    }
}

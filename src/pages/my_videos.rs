use super::{reconcile_list, Context, Phase};
use crate::client::Pending;
use crate::error::ApiResult;
use crate::models::{Session, Video};

pub const LOGIN_PROMPT: &str = "Please login to manage your videos";

/// The logged-in user's uploads, with edit and delete entry points.
pub struct MyVideos {
    ctx: Context,
    session: Option<Session>,
    pub phase: Phase,
    pub videos: Vec<Video>,
    /// Video awaiting delete confirmation.
    pub confirming: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl MyVideos {
    /// Without a session the page shows a login prompt and fetches nothing.
    pub fn mount(ctx: &Context) -> (Self, Option<Pending<Vec<Video>>>) {
        let session = ctx.session();
        let fetch = session
            .as_ref()
            .map(|s| ctx.backend.user_videos(&s.email));
        let phase = if fetch.is_some() {
            Phase::Loading
        } else {
            Phase::SignedOut
        };
        let page = MyVideos {
            ctx: ctx.clone(),
            session,
            phase,
            videos: vec![],
            confirming: None,
            notice: None,
            error: None,
        };
        (page, fetch)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn videos_loaded(&mut self, result: ApiResult<Vec<Video>>) {
        self.phase = reconcile_list(&mut self.videos, result);
    }

    pub fn request_delete(&mut self, video_id: &str) {
        if self.videos.iter().any(|v| v.id == video_id) {
            self.confirming = Some(video_id.to_string());
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirming = None;
    }

    /// Issues the delete for the video awaiting confirmation.
    pub fn confirm_delete(&mut self) -> Option<(String, Pending<()>)> {
        let id = self.confirming.take()?;
        self.notice = None;
        self.error = None;
        let call = self.ctx.backend.delete_video(&id);
        Some((id, call))
    }

    /// Drops the deleted video from the local list; nothing is re-fetched.
    pub fn delete_done(&mut self, video_id: &str, result: ApiResult<()>) {
        match result {
            Ok(()) => {
                self.videos.retain(|v| v.id != video_id);
                self.phase = Phase::for_list(&self.videos);
                self.notice = Some("Video deleted successfully".to_string());
                log::info!("deleted video {}", video_id);
            }
            Err(e) => {
                log::warn!("delete of {} failed: {:?}", video_id, e);
                self.error = Some(e.user_message());
            }
        }
    }
}

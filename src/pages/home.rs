use super::{reconcile_list, Context, Phase};
use crate::client::Pending;
use crate::error::{ApiResult, Precondition};
use crate::models::{Comment, Session, Video};

/// The detail/player state opened from the feed.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub video: Video,
    /// Newest first.
    pub comments: Vec<Comment>,
    pub draft: String,
}

impl Overlay {
    fn new(video: Video) -> Self {
        Overlay {
            video,
            comments: vec![],
            draft: String::new(),
        }
    }
}

/// The feed of all videos plus the optional detail overlay.
pub struct Home {
    ctx: Context,
    session: Option<Session>,
    pub phase: Phase,
    pub videos: Vec<Video>,
    pub overlay: Option<Overlay>,
    /// Last prompt or error, cleared on the next action.
    pub notice: Option<String>,
}

fn newest_first(mut comments: Vec<Comment>) -> Vec<Comment> {
    comments.reverse();
    comments
}

impl Home {
    pub fn mount(ctx: &Context) -> (Self, Pending<Vec<Video>>) {
        let home = Home {
            ctx: ctx.clone(),
            session: ctx.session(),
            phase: Phase::Loading,
            videos: vec![],
            overlay: None,
            notice: None,
        };
        let fetch = ctx.backend.list_videos();
        (home, fetch)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn videos_loaded(&mut self, result: ApiResult<Vec<Video>>) {
        self.phase = reconcile_list(&mut self.videos, result);
    }

    /// Opens the overlay for a feed entry and fetches its comments.
    pub fn open(&mut self, video_id: &str) -> Option<Pending<Vec<Comment>>> {
        let video = self.videos.iter().find(|v| v.id == video_id)?.clone();
        self.notice = None;
        let fetch = self.ctx.backend.comments(&video.id);
        self.overlay = Some(Overlay::new(video));
        Some(fetch)
    }

    pub fn comments_loaded(&mut self, video_id: &str, result: ApiResult<Vec<Comment>>) {
        let Some(overlay) = self.overlay.as_mut().filter(|o| o.video.id == video_id) else {
            return;
        };
        match result {
            Ok(comments) => overlay.comments = newest_first(comments),
            Err(e) => {
                log::warn!("failed to fetch comments for {}: {:?}", video_id, e);
                overlay.comments.clear();
                self.notice = Some(e.user_message());
            }
        }
    }

    pub fn close(&mut self) {
        self.overlay = None;
        self.notice = None;
    }

    pub fn set_draft(&mut self, text: String) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.draft = text;
        }
    }

    /// Whether the open video is liked by the current user.
    pub fn liked(&self) -> bool {
        match (&self.overlay, &self.session) {
            (Some(overlay), Some(session)) => overlay.video.is_liked_by(&session.email),
            _ => false,
        }
    }

    fn signed_in(&mut self, prompt: &'static str) -> Result<(String, String), Precondition> {
        self.notice = None;
        let Some(session) = self.session.as_ref() else {
            self.notice = Some(prompt.to_string());
            return Err(Precondition::LoginRequired(prompt));
        };
        let Some(overlay) = self.overlay.as_ref() else {
            return Err(Precondition::NothingOpen);
        };
        Ok((overlay.video.id.clone(), session.email.clone()))
    }

    pub fn like(&mut self) -> Result<Pending<Video>, Precondition> {
        let (id, user) = self.signed_in("Please login to like videos")?;
        Ok(self.ctx.backend.like(&id, &user))
    }

    pub fn unlike(&mut self) -> Result<Pending<Video>, Precondition> {
        let (id, user) = self.signed_in("Please login to unlike videos")?;
        Ok(self.ctx.backend.unlike(&id, &user))
    }

    /// Like or unlike depending on the current like state.
    pub fn toggle_like(&mut self) -> Result<Pending<Video>, Precondition> {
        if self.liked() {
            self.unlike()
        } else {
            self.like()
        }
    }

    /// `Ok(None)` when the draft is blank: nothing is sent and nothing shown.
    pub fn submit_comment(&mut self) -> Result<Option<Pending<Video>>, Precondition> {
        let (id, user) = self.signed_in("Please login to comment")?;
        let text = self
            .overlay
            .as_ref()
            .map(|o| o.draft.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.ctx.backend.add_comment(&id, &user, &text)))
    }

    /// Applies the video returned by like/unlike.
    pub fn reaction_done(&mut self, result: ApiResult<Video>) {
        self.apply_update(result, false);
    }

    /// Applies the video returned by a comment and resets the draft.
    pub fn comment_done(&mut self, result: ApiResult<Video>) {
        self.apply_update(result, true);
    }

    fn apply_update(&mut self, result: ApiResult<Video>, from_comment: bool) {
        let updated = match result {
            Ok(video) => video,
            Err(e) => {
                log::warn!("video action failed: {:?}", e);
                self.notice = Some(e.user_message());
                return;
            }
        };

        if let Some(entry) = self.videos.iter_mut().find(|v| v.id == updated.id) {
            *entry = updated.clone();
        }
        if let Some(overlay) = self.overlay.as_mut().filter(|o| o.video.id == updated.id) {
            if from_comment {
                overlay.comments = newest_first(updated.comments.clone());
                overlay.draft.clear();
            }
            overlay.video = updated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::storage::MemorySessionStore;
    use crate::testing::{comment, video, FakeBackend};
    use std::sync::Arc;

    fn context(backend: Arc<FakeBackend>, session: Option<Session>) -> Context {
        let store = match session {
            Some(s) => MemorySessionStore::with_session(&s),
            None => MemorySessionStore::new(),
        };
        Context::new(backend, Arc::new(store))
    }

    async fn mounted(backend: &Arc<FakeBackend>, session: Option<Session>) -> Home {
        let (mut home, fetch) = Home::mount(&context(backend.clone(), session));
        assert_eq!(home.phase, Phase::Loading);
        home.videos_loaded(fetch.await);
        home
    }

    fn alice() -> Session {
        Session::new("alice@example.com")
    }

    #[tokio::test]
    async fn test_empty_feed_renders_empty_state() {
        let backend = Arc::new(FakeBackend::new());
        let home = mounted(&backend, None).await;
        assert_eq!(home.phase, Phase::Empty);
    }

    #[tokio::test]
    async fn test_feed_failure_is_error_state() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail_with(ApiError::Transport("refused".to_string()));
        let home = mounted(&backend, None).await;
        assert_eq!(home.phase, Phase::Error("Something went wrong".to_string()));
    }

    #[tokio::test]
    async fn test_open_shows_comments_newest_first() {
        let mut v = video("v1", "bob@example.com");
        v.comments = vec![comment("a", "first"), comment("b", "second")];
        let backend = Arc::new(FakeBackend::with_videos(vec![v]));
        let mut home = mounted(&backend, None).await;
        assert_eq!(home.phase, Phase::Ready);

        let fetch = home.open("v1").unwrap();
        home.comments_loaded("v1", fetch.await);

        let texts: Vec<_> = home
            .overlay
            .as_ref()
            .unwrap()
            .comments
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_close_clears_overlay_state() {
        let backend = Arc::new(FakeBackend::with_videos(vec![video("v1", "bob@example.com")]));
        let mut home = mounted(&backend, Some(alice())).await;
        let _ = home.open("v1").unwrap();
        home.set_draft("half written".to_string());
        home.close();
        assert!(home.overlay.is_none());

        // a late comment response for the closed overlay is dropped
        home.comments_loaded("v1", Ok(vec![comment("a", "late")]));
        assert!(home.overlay.is_none());
    }

    #[tokio::test]
    async fn test_actions_without_session_make_no_calls() {
        let backend = Arc::new(FakeBackend::with_videos(vec![video("v1", "bob@example.com")]));
        let mut home = mounted(&backend, None).await;
        let fetch = home.open("v1").unwrap();
        home.comments_loaded("v1", fetch.await);
        let calls_before = backend.calls().len();

        assert_eq!(
            home.like().err(),
            Some(Precondition::LoginRequired("Please login to like videos"))
        );
        assert_eq!(home.notice.as_deref(), Some("Please login to like videos"));
        assert!(home.unlike().is_err());
        home.set_draft("hello".to_string());
        assert_eq!(
            home.submit_comment().err(),
            Some(Precondition::LoginRequired("Please login to comment"))
        );

        assert_eq!(backend.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_like_replaces_open_video_with_response() {
        let backend = Arc::new(FakeBackend::with_videos(vec![video("v1", "bob@example.com")]));
        let mut home = mounted(&backend, Some(alice())).await;
        let _ = home.open("v1").unwrap();

        let response = home.like().unwrap().await;
        let expected = response.clone().unwrap();
        home.reaction_done(response);

        let overlay = home.overlay.as_ref().unwrap();
        assert_eq!(overlay.video, expected);
        assert!(home.liked());
        assert_eq!(home.videos[0].like_count(), 1);

        let response = home.toggle_like().unwrap().await;
        home.reaction_done(response);
        assert!(!home.liked());
        assert_eq!(backend.calls().last().unwrap(), "POST /videos/v1/unlike");
    }

    #[tokio::test]
    async fn test_reaction_response_is_not_merged_with_prior_state() {
        let mut stale = video("v1", "bob@example.com");
        stale.likes = vec!["zed@example.com".to_string()];
        stale.title = "Old".to_string();
        let backend = Arc::new(FakeBackend::with_videos(vec![stale]));
        let mut home = mounted(&backend, Some(alice())).await;
        let _ = home.open("v1").unwrap();

        let mut fresh = video("v1", "bob@example.com");
        fresh.title = "Renamed".to_string();
        fresh.likes = vec!["alice@example.com".to_string()];
        home.reaction_done(Ok(fresh.clone()));

        assert_eq!(home.overlay.as_ref().unwrap().video, fresh);
    }

    #[tokio::test]
    async fn test_comment_replaces_list_and_clears_draft() {
        let mut v = video("v1", "bob@example.com");
        v.comments = vec![comment("bob@example.com", "earlier")];
        let backend = Arc::new(FakeBackend::with_videos(vec![v]));
        let mut home = mounted(&backend, Some(alice())).await;
        let fetch = home.open("v1").unwrap();
        home.comments_loaded("v1", fetch.await);

        home.set_draft("  great video ".to_string());
        let send = home.submit_comment().unwrap().unwrap();
        home.comment_done(send.await);

        let overlay = home.overlay.as_ref().unwrap();
        assert_eq!(overlay.draft, "");
        assert_eq!(overlay.comments.len(), 2);
        assert_eq!(overlay.comments[0].text, "great video");
        assert_eq!(overlay.comments[0].user_id, "alice@example.com");
    }

    #[tokio::test]
    async fn test_blank_comment_is_silently_ignored() {
        let backend = Arc::new(FakeBackend::with_videos(vec![video("v1", "bob@example.com")]));
        let mut home = mounted(&backend, Some(alice())).await;
        let _ = home.open("v1").unwrap();
        let calls_before = backend.calls().len();

        home.set_draft("   ".to_string());
        assert!(home.submit_comment().unwrap().is_none());
        assert_eq!(home.notice, None);
        assert_eq!(backend.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_failed_action_keeps_video_and_shows_error() {
        let backend = Arc::new(FakeBackend::with_videos(vec![video("v1", "bob@example.com")]));
        let mut home = mounted(&backend, Some(alice())).await;
        let _ = home.open("v1").unwrap();
        let before = home.overlay.clone();

        home.reaction_done(Err(ApiError::Rejected {
            status: 404,
            message: "Video not found".to_string(),
        }));

        assert_eq!(home.overlay, before);
        assert_eq!(home.notice.as_deref(), Some("Video not found"));
    }
}

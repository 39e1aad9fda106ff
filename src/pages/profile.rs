use super::{reconcile_list, Context, Phase};
use crate::client::Pending;
use crate::error::ApiResult;
use crate::models::{Session, Video};
use crate::routes::Route;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    pub videos: usize,
    pub likes: usize,
    /// The backend never reports views, so this is normally zero.
    pub views: u64,
}

impl Stats {
    pub fn from_videos(videos: &[Video]) -> Self {
        Stats {
            videos: videos.len(),
            likes: videos.iter().map(Video::like_count).sum(),
            views: videos.iter().map(Video::view_count).sum(),
        }
    }
}

/// `1.2K` / `3.4M` style counts.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Overview,
    Videos,
    Analytics,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileDraft {
    pub name: String,
    pub bio: String,
    pub website: String,
}

impl ProfileDraft {
    fn from_session(session: &Session) -> Self {
        ProfileDraft {
            name: session.name.clone().unwrap_or_default(),
            bio: session.bio.clone().unwrap_or_default(),
            website: session.website.clone().unwrap_or_default(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub enum ProfileMount {
    /// No session: go to login, nothing fetched.
    Redirect(Route),
    Loaded(Profile, Pending<Vec<Video>>),
}

pub struct Profile {
    ctx: Context,
    pub session: Session,
    pub phase: Phase,
    pub videos: Vec<Video>,
    pub stats: Stats,
    pub tab: Tab,
    pub editing: Option<ProfileDraft>,
    pub notice: Option<String>,
}

impl Profile {
    pub fn mount(ctx: &Context) -> ProfileMount {
        let Some(session) = ctx.session() else {
            return ProfileMount::Redirect(Route::Login);
        };
        let fetch = ctx.backend.user_videos(&session.email);
        let profile = Profile {
            ctx: ctx.clone(),
            session,
            phase: Phase::Loading,
            videos: vec![],
            stats: Stats::default(),
            tab: Tab::default(),
            editing: None,
            notice: None,
        };
        ProfileMount::Loaded(profile, fetch)
    }

    pub fn videos_loaded(&mut self, result: ApiResult<Vec<Video>>) {
        self.phase = reconcile_list(&mut self.videos, result);
        self.stats = Stats::from_videos(&self.videos);
    }

    /// Up to five uploads for the overview tab.
    pub fn recent_activity(&self) -> &[Video] {
        &self.videos[..self.videos.len().min(5)]
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn start_edit(&mut self) {
        self.notice = None;
        self.editing = Some(ProfileDraft::from_session(&self.session));
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Merges the draft into the session record and persists it locally.
    /// No backend call is made.
    pub fn save(&mut self) -> anyhow::Result<()> {
        let Some(draft) = self.editing.as_ref() else {
            return Ok(());
        };
        let updated = Session {
            email: self.session.email.clone(),
            name: non_empty(&draft.name),
            bio: non_empty(&draft.bio),
            website: non_empty(&draft.website),
        };
        if let Err(e) = self.ctx.sessions.save(&updated) {
            self.notice = Some("Failed to update profile. Please try again.".to_string());
            return Err(e);
        }
        self.session = updated;
        self.editing = None;
        self.notice = Some("Profile updated successfully!".to_string());
        Ok(())
    }
}

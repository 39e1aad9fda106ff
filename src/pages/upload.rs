use super::{require, Context};
use crate::client::Pending;
use crate::error::{ApiResult, Precondition};
use crate::models::{parse_tags, NewVideo, Session, Video, VideoMetadata};
use crate::routes::Route;
use std::path::PathBuf;

/// Text fields shared by both form modes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields {
    pub title: String,
    pub description: String,
    /// Comma separated.
    pub tags: String,
}

impl Fields {
    fn validate(&self) -> Result<(), Precondition> {
        require(&self.title, "Title")?;
        require(&self.description, "Description")?;
        require(&self.tags, "Tags")
    }

    fn from_video(video: &Video) -> Self {
        Fields {
            title: video.title.clone(),
            description: video.description.clone(),
            tags: video.tags.join(", "),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateDraft {
    pub file: Option<PathBuf>,
    pub fields: Fields,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditDraft {
    pub video_id: String,
    pub fields: Fields,
    /// Existing metadata has arrived.
    pub loaded: bool,
    pub confirming_delete: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Draft {
    Create(CreateDraft),
    Edit(EditDraft),
}

/// Upload form (`/upload`) and edit form (`/edit/{id}`).
pub struct VideoForm {
    ctx: Context,
    session: Option<Session>,
    pub draft: Draft,
    pub error: Option<String>,
}

impl VideoForm {
    pub fn create(ctx: &Context) -> Self {
        VideoForm {
            ctx: ctx.clone(),
            session: ctx.session(),
            draft: Draft::Create(CreateDraft::default()),
            error: None,
        }
    }

    /// Edit mode starts by fetching the existing metadata.
    pub fn edit(ctx: &Context, video_id: &str) -> (Self, Pending<Video>) {
        let form = VideoForm {
            ctx: ctx.clone(),
            session: ctx.session(),
            draft: Draft::Edit(EditDraft {
                video_id: video_id.to_string(),
                fields: Fields::default(),
                loaded: false,
                confirming_delete: false,
            }),
            error: None,
        };
        (form, ctx.backend.get_video(video_id))
    }

    pub fn for_route(ctx: &Context, route: &Route) -> (Self, Option<Pending<Video>>) {
        match route {
            Route::Edit(id) => {
                let (form, fetch) = Self::edit(ctx, id);
                (form, Some(fetch))
            }
            _ => (Self::create(ctx), None),
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.draft, Draft::Edit(_))
    }

    pub fn fields(&self) -> &Fields {
        match &self.draft {
            Draft::Create(d) => &d.fields,
            Draft::Edit(d) => &d.fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut Fields {
        match &mut self.draft {
            Draft::Create(d) => &mut d.fields,
            Draft::Edit(d) => &mut d.fields,
        }
    }

    /// Only the create form takes a file; edits never re-upload.
    pub fn select_file(&mut self, path: Option<PathBuf>) {
        if let Draft::Create(d) = &mut self.draft {
            d.file = path.filter(|p| !p.as_os_str().is_empty());
        }
    }

    pub fn loaded(&mut self, result: ApiResult<Video>) {
        let Draft::Edit(d) = &mut self.draft else {
            return;
        };
        match result {
            Ok(video) if video.id == d.video_id => {
                d.fields = Fields::from_video(&video);
                d.loaded = true;
            }
            Ok(video) => log::warn!("ignoring metadata for {} on edit form of {}", video.id, d.video_id),
            Err(e) => {
                log::warn!("failed to load {}: {:?}", d.video_id, e);
                self.error = Some(e.user_message());
            }
        }
    }

    /// Upload in create mode, metadata-only update in edit mode.
    pub fn submit(&mut self) -> Result<Pending<String>, Precondition> {
        self.error = None;
        let result = self.prepare();
        if let Err(rejected) = &result {
            self.error = Some(rejected.to_string());
        }
        result
    }

    fn prepare(&self) -> Result<Pending<String>, Precondition> {
        match &self.draft {
            Draft::Create(d) => {
                let file = d.file.clone().ok_or(Precondition::NoFileSelected)?;
                let session = self.session.as_ref().ok_or(Precondition::LoginRequired(
                    "You must be logged in to upload videos",
                ))?;
                d.fields.validate()?;
                Ok(self.ctx.backend.upload_video(NewVideo {
                    file,
                    title: d.fields.title.trim().to_string(),
                    description: d.fields.description.trim().to_string(),
                    tags: d.fields.tags.trim().to_string(),
                    uploaded_by: session.email.clone(),
                }))
            }
            Draft::Edit(d) => {
                d.fields.validate()?;
                Ok(self.ctx.backend.update_video(
                    &d.video_id,
                    VideoMetadata {
                        title: d.fields.title.trim().to_string(),
                        description: d.fields.description.trim().to_string(),
                        tags: parse_tags(&d.fields.tags),
                    },
                ))
            }
        }
    }

    /// Both modes land on my-videos after success, carrying the backend's
    /// message.
    pub fn submitted(&mut self, result: ApiResult<String>) -> Option<(Route, String)> {
        match result {
            Ok(message) => {
                log::info!("video saved: {}", message);
                Some((Route::MyVideos, message))
            }
            Err(e) => {
                self.error = Some(e.user_message());
                None
            }
        }
    }

    pub fn request_delete(&mut self) {
        if let Draft::Edit(d) = &mut self.draft {
            d.confirming_delete = true;
        }
    }

    pub fn cancel_delete(&mut self) {
        if let Draft::Edit(d) = &mut self.draft {
            d.confirming_delete = false;
        }
    }

    pub fn confirm_delete(&mut self) -> Option<Pending<()>> {
        let Draft::Edit(d) = &mut self.draft else {
            return None;
        };
        if !d.confirming_delete {
            return None;
        }
        d.confirming_delete = false;
        self.error = None;
        Some(self.ctx.backend.delete_video(&d.video_id))
    }

    pub fn deleted(&mut self, result: ApiResult<()>) -> Option<Route> {
        match result {
            Ok(()) => Some(Route::MyVideos),
            Err(e) => {
                self.error = Some(e.user_message());
                None
            }
        }
    }
}

use iced::widget::{button, column, container, row, scrollable, text, text_input, Column, Row};
use iced::{Alignment, Application, Command, Element, Length, Settings, Theme};
use std::path::PathBuf;
use videohub::error::ApiResult;
use videohub::models::{Comment, Session, Video};
use videohub::pages::auth::{LoginForm, RegisterForm};
use videohub::pages::home::Home;
use videohub::pages::my_videos::{MyVideos, LOGIN_PROMPT};
use videohub::pages::profile::{format_count, Profile, ProfileMount, Tab};
use videohub::pages::upload::{Draft, VideoForm};
use videohub::pages::{nav, Context, Phase};
use videohub::relative_time::{format_date, time_ago_now};
use videohub::routes::Route;

pub fn run(ctx: Context, start: Route) -> iced::Result {
    VideoHub::run(Settings::with_flags((ctx, start)))
}

enum Page {
    Home(Home),
    MyVideos(MyVideos),
    Form(VideoForm),
    Login(LoginForm),
    Register(RegisterForm),
    Profile(Profile),
}

struct VideoHub {
    ctx: Context,
    route: Route,
    session: Option<Session>,
    page: Page,
    status: String,
}

#[derive(Clone, Debug)]
enum AppMessage {
    Navigate(Route),
    Logout,

    FeedLoaded(ApiResult<Vec<Video>>),
    OpenVideo(String),
    CommentsLoaded(String, ApiResult<Vec<Comment>>),
    CloseVideo,
    CommentDraftChanged(String),
    ToggleLike,
    SubmitComment,
    ReactionDone(ApiResult<Video>),
    CommentDone(ApiResult<Video>),

    MyVideosLoaded(ApiResult<Vec<Video>>),
    RequestDelete(String),
    ConfirmDelete,
    CancelDelete,
    Deleted(String, ApiResult<()>),

    FormLoaded(ApiResult<Video>),
    TitleChanged(String),
    DescriptionChanged(String),
    TagsChanged(String),
    FilePathChanged(String),
    SubmitVideo,
    VideoSaved(ApiResult<String>),
    FormDeleted(ApiResult<()>),

    NameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    SubmitLogin,
    LoggedIn(ApiResult<Session>),
    SubmitRegister,
    Registered(ApiResult<String>),

    ProfileLoaded(ApiResult<Vec<Video>>),
    SelectTab(Tab),
    EditProfile,
    BioChanged(String),
    WebsiteChanged(String),
    SaveProfile,
    CancelProfileEdit,
}

/// What a page handler wants the shell to do next.
enum Next {
    Stay(Command<AppMessage>),
    Go(Route),
    GoWithStatus(Route, String),
}

impl Next {
    fn none() -> Self {
        Next::Stay(Command::none())
    }
}

impl VideoHub {
    fn navigate(&mut self, route: Route) -> Command<AppMessage> {
        log::info!("navigating to {}", route.path());
        self.session = self.ctx.session();
        self.status.clear();

        let (page, command) = match &route {
            Route::Home => {
                let (home, fetch) = Home::mount(&self.ctx);
                (Page::Home(home), Command::perform(fetch, AppMessage::FeedLoaded))
            }
            Route::MyVideos => {
                let (page, fetch) = MyVideos::mount(&self.ctx);
                let command = match fetch {
                    Some(fetch) => Command::perform(fetch, AppMessage::MyVideosLoaded),
                    None => Command::none(),
                };
                (Page::MyVideos(page), command)
            }
            Route::Upload | Route::Edit(_) => {
                let (form, fetch) = VideoForm::for_route(&self.ctx, &route);
                let command = match fetch {
                    Some(fetch) => Command::perform(fetch, AppMessage::FormLoaded),
                    None => Command::none(),
                };
                (Page::Form(form), command)
            }
            Route::Login => (Page::Login(LoginForm::new(&self.ctx)), Command::none()),
            Route::Register => (Page::Register(RegisterForm::new(&self.ctx)), Command::none()),
            Route::Profile => match Profile::mount(&self.ctx) {
                ProfileMount::Redirect(to) => return self.navigate(to),
                ProfileMount::Loaded(profile, fetch) => (
                    Page::Profile(profile),
                    Command::perform(fetch, AppMessage::ProfileLoaded),
                ),
            },
        };

        self.route = route;
        self.page = page;
        command
    }

    fn follow(&mut self, next: Next) -> Command<AppMessage> {
        match next {
            Next::Stay(command) => command,
            Next::Go(route) => self.navigate(route),
            Next::GoWithStatus(route, status) => {
                let command = self.navigate(route);
                self.status = status;
                command
            }
        }
    }

    fn nav_bar(&self) -> Element<'_, AppMessage> {
        let mut bar = Row::new().spacing(10).align_items(Alignment::Center);
        bar = bar.push(text("VideoHub").size(24));
        for item in nav::menu(self.session.as_ref()) {
            let mut entry = button(item.label).padding(8);
            if item.route != self.route {
                entry = entry.on_press(AppMessage::Navigate(item.route));
            }
            bar = bar.push(entry);
        }
        if let Some(session) = &self.session {
            bar = bar
                .push(text(session.email.as_str()))
                .push(button("Logout").padding(8).on_press(AppMessage::Logout));
        }
        bar.into()
    }
}

impl Application for VideoHub {
    type Executor = iced::executor::Default;
    type Message = AppMessage;
    type Theme = Theme;
    type Flags = (Context, Route);

    fn new((ctx, start): (Context, Route)) -> (Self, Command<AppMessage>) {
        let (home, fetch) = Home::mount(&ctx);
        let mut app = VideoHub {
            session: ctx.session(),
            ctx,
            route: Route::Home,
            page: Page::Home(home),
            status: String::new(),
        };
        if start == Route::Home {
            return (app, Command::perform(fetch, AppMessage::FeedLoaded));
        }
        let command = app.navigate(start);
        (app, command)
    }

    fn title(&self) -> String {
        String::from("VideoHub")
    }

    fn update(&mut self, message: AppMessage) -> Command<AppMessage> {
        let next = match message {
            AppMessage::Navigate(route) => Next::Go(route),
            AppMessage::Logout => Next::Go(nav::logout(&*self.ctx.sessions)),
            message => match &mut self.page {
                Page::Home(home) => update_home(home, message),
                Page::MyVideos(page) => update_my_videos(page, message),
                Page::Form(form) => update_form(form, message),
                Page::Login(form) => update_login(form, message),
                Page::Register(form) => update_register(form, message),
                Page::Profile(profile) => update_profile(profile, message),
            },
        };
        if let Page::Profile(profile) = &self.page {
            // profile edits rewrite the stored session
            self.session = Some(profile.session.clone());
        }
        self.follow(next)
    }

    fn view(&self) -> Element<AppMessage> {
        let body = match &self.page {
            Page::Home(home) => view_home(home),
            Page::MyVideos(page) => view_my_videos(page),
            Page::Form(form) => view_form(form),
            Page::Login(form) => view_login(form),
            Page::Register(form) => view_register(form),
            Page::Profile(profile) => view_profile(profile),
        };

        let mut layout = Column::new().spacing(20).padding(20).push(self.nav_bar());
        if !self.status.is_empty() {
            layout = layout.push(text(&self.status).size(16));
        }
        container(scrollable(layout.push(body)))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn update_home(home: &mut Home, message: AppMessage) -> Next {
    match message {
        AppMessage::FeedLoaded(result) => home.videos_loaded(result),
        AppMessage::OpenVideo(id) => {
            if let Some(fetch) = home.open(&id) {
                return Next::Stay(Command::perform(fetch, move |r| {
                    AppMessage::CommentsLoaded(id, r)
                }));
            }
        }
        AppMessage::CommentsLoaded(id, result) => home.comments_loaded(&id, result),
        AppMessage::CloseVideo => home.close(),
        AppMessage::CommentDraftChanged(draft) => home.set_draft(draft),
        AppMessage::ToggleLike => {
            if let Ok(call) = home.toggle_like() {
                return Next::Stay(Command::perform(call, AppMessage::ReactionDone));
            }
        }
        AppMessage::SubmitComment => {
            if let Ok(Some(call)) = home.submit_comment() {
                return Next::Stay(Command::perform(call, AppMessage::CommentDone));
            }
        }
        AppMessage::ReactionDone(result) => home.reaction_done(result),
        AppMessage::CommentDone(result) => home.comment_done(result),
        _ => {}
    }
    Next::none()
}

fn update_my_videos(page: &mut MyVideos, message: AppMessage) -> Next {
    match message {
        AppMessage::MyVideosLoaded(result) => page.videos_loaded(result),
        AppMessage::RequestDelete(id) => page.request_delete(&id),
        AppMessage::CancelDelete => page.cancel_delete(),
        AppMessage::ConfirmDelete => {
            if let Some((id, call)) = page.confirm_delete() {
                return Next::Stay(Command::perform(call, move |r| AppMessage::Deleted(id, r)));
            }
        }
        AppMessage::Deleted(id, result) => page.delete_done(&id, result),
        _ => {}
    }
    Next::none()
}

fn update_form(form: &mut VideoForm, message: AppMessage) -> Next {
    match message {
        AppMessage::FormLoaded(result) => form.loaded(result),
        AppMessage::TitleChanged(v) => form.fields_mut().title = v,
        AppMessage::DescriptionChanged(v) => form.fields_mut().description = v,
        AppMessage::TagsChanged(v) => form.fields_mut().tags = v,
        AppMessage::FilePathChanged(v) => form.select_file(Some(PathBuf::from(v))),
        AppMessage::SubmitVideo => {
            if let Ok(call) = form.submit() {
                return Next::Stay(Command::perform(call, AppMessage::VideoSaved));
            }
        }
        AppMessage::VideoSaved(result) => {
            if let Some((route, message)) = form.submitted(result) {
                return Next::GoWithStatus(route, message);
            }
        }
        AppMessage::RequestDelete(_) => form.request_delete(),
        AppMessage::CancelDelete => form.cancel_delete(),
        AppMessage::ConfirmDelete => {
            if let Some(call) = form.confirm_delete() {
                return Next::Stay(Command::perform(call, AppMessage::FormDeleted));
            }
        }
        AppMessage::FormDeleted(result) => {
            if let Some(route) = form.deleted(result) {
                return Next::GoWithStatus(route, "Video deleted successfully".to_string());
            }
        }
        _ => {}
    }
    Next::none()
}

fn update_login(form: &mut LoginForm, message: AppMessage) -> Next {
    match message {
        AppMessage::EmailChanged(v) => form.email = v,
        AppMessage::PasswordChanged(v) => form.password = v,
        AppMessage::SubmitLogin => {
            if let Ok(call) = form.submit() {
                return Next::Stay(Command::perform(call, AppMessage::LoggedIn));
            }
        }
        AppMessage::LoggedIn(result) => {
            if let Some(route) = form.finished(result) {
                return Next::GoWithStatus(route, "Login successful".to_string());
            }
        }
        _ => {}
    }
    Next::none()
}

fn update_register(form: &mut RegisterForm, message: AppMessage) -> Next {
    match message {
        AppMessage::NameChanged(v) => form.name = v,
        AppMessage::EmailChanged(v) => form.email = v,
        AppMessage::PasswordChanged(v) => form.password = v,
        AppMessage::SubmitRegister => {
            if let Ok(call) = form.submit() {
                return Next::Stay(Command::perform(call, AppMessage::Registered));
            }
        }
        AppMessage::Registered(result) => {
            if let Some((route, message)) = form.finished(result) {
                return Next::GoWithStatus(route, message);
            }
        }
        _ => {}
    }
    Next::none()
}

fn update_profile(profile: &mut Profile, message: AppMessage) -> Next {
    match message {
        AppMessage::ProfileLoaded(result) => profile.videos_loaded(result),
        AppMessage::SelectTab(tab) => profile.select_tab(tab),
        AppMessage::EditProfile => profile.start_edit(),
        AppMessage::CancelProfileEdit => profile.cancel_edit(),
        AppMessage::NameChanged(v) => {
            if let Some(draft) = profile.editing.as_mut() {
                draft.name = v;
            }
        }
        AppMessage::BioChanged(v) => {
            if let Some(draft) = profile.editing.as_mut() {
                draft.bio = v;
            }
        }
        AppMessage::WebsiteChanged(v) => {
            if let Some(draft) = profile.editing.as_mut() {
                draft.website = v;
            }
        }
        AppMessage::SaveProfile => {
            if let Err(e) = profile.save() {
                log::warn!("profile save failed: {:?}", e);
            }
        }
        _ => {}
    }
    Next::none()
}

fn notice<'a>(message: &Option<String>) -> Element<'a, AppMessage> {
    match message {
        Some(m) => text(m).size(16).into(),
        None => Column::new().into(),
    }
}

fn phase_banner<'a>(phase: &Phase, loading: &str, empty: &str) -> Option<Element<'a, AppMessage>> {
    match phase {
        Phase::Loading => Some(text(loading).into()),
        Phase::Empty => Some(text(empty).size(20).into()),
        Phase::Error(message) => Some(text(message).into()),
        Phase::SignedOut => Some(
            column![
                text(LOGIN_PROMPT).size(20),
                button("Login").on_press(AppMessage::Navigate(Route::Login)),
            ]
            .spacing(10)
            .into(),
        ),
        Phase::Ready => None,
    }
}

fn video_card(video: &Video) -> Element<'_, AppMessage> {
    button(
        column![
            text(&video.title).size(18),
            text(&video.uploaded_by).size(14),
            text(format!(
                "{} likes · {}",
                video.like_count(),
                time_ago_now(video.uploaded_at)
            ))
            .size(12),
        ]
        .spacing(4),
    )
    .width(Length::Fill)
    .on_press(AppMessage::OpenVideo(video.id.clone()))
    .into()
}

fn view_home(home: &Home) -> Element<'_, AppMessage> {
    if let Some(overlay) = &home.overlay {
        let video = &overlay.video;
        let like_label = if home.liked() { "Unlike" } else { "Like" };
        let tags = video
            .tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ");

        let comments = if overlay.comments.is_empty() {
            Column::new().push(text("No comments yet"))
        } else {
            Column::with_children(overlay.comments.iter().map(|c| {
                column![
                    text(format!("{} · {}", c.user_id, time_ago_now(c.created_at))).size(12),
                    text(&c.text),
                ]
                .spacing(2)
                .into()
            }))
            .spacing(10)
        };

        return column![
            row![
                text(&video.title).size(26),
                button("Close").on_press(AppMessage::CloseVideo),
            ]
            .spacing(20)
            .align_items(Alignment::Center),
            text(&video.video_url).size(12),
            text(format!(
                "{} · {}",
                video.uploaded_by,
                time_ago_now(video.uploaded_at)
            )),
            text(&video.description),
            text(tags).size(12),
            row![
                text(format!("{} likes", video.like_count())),
                button(like_label).on_press(AppMessage::ToggleLike),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
            notice(&home.notice),
            row![
                text_input("Add a comment...", &overlay.draft)
                    .on_input(AppMessage::CommentDraftChanged)
                    .on_submit(AppMessage::SubmitComment)
                    .padding(8),
                button("Comment").on_press(AppMessage::SubmitComment),
            ]
            .spacing(10),
            comments,
        ]
        .spacing(12)
        .into();
    }

    if let Some(banner) = phase_banner(&home.phase, "Loading videos...", "No videos available") {
        return banner;
    }
    Column::with_children(home.videos.iter().map(video_card))
        .spacing(10)
        .into()
}

fn view_my_videos(page: &MyVideos) -> Element<'_, AppMessage> {
    if page.phase == Phase::SignedOut {
        return phase_banner(&page.phase, "", "").unwrap_or_else(|| Column::new().into());
    }

    let header = row![
        text(format!("My Videos ({})", page.videos.len())).size(26),
        button("Upload New Video").on_press(AppMessage::Navigate(Route::Upload)),
    ]
    .spacing(20)
    .align_items(Alignment::Center);

    let mut content = Column::new()
        .spacing(12)
        .push(header)
        .push(notice(&page.notice))
        .push(notice(&page.error));

    if let Some(id) = &page.confirming {
        content = content.push(
            row![
                text(format!(
                    "Delete video {}? This action cannot be undone.",
                    id
                )),
                button("Delete").on_press(AppMessage::ConfirmDelete),
                button("Cancel").on_press(AppMessage::CancelDelete),
            ]
            .spacing(10),
        );
    }

    if let Some(banner) = phase_banner(&page.phase, "Loading your videos...", "No videos uploaded yet") {
        return content.push(banner).into();
    }

    content
        .push(Column::with_children(page.videos.iter().map(|video| {
            row![
                column![
                    text(&video.title).size(18),
                    text(&video.description).size(14),
                    text(format!(
                        "{} · {} likes",
                        format_date(video.uploaded_at),
                        video.like_count()
                    ))
                    .size(12),
                ]
                .width(Length::Fill),
                button("Edit").on_press(AppMessage::Navigate(Route::Edit(video.id.clone()))),
                button("Delete").on_press(AppMessage::RequestDelete(video.id.clone())),
            ]
            .spacing(10)
            .align_items(Alignment::Center)
            .into()
        })))
        .into()
}

fn view_form(form: &VideoForm) -> Element<'_, AppMessage> {
    let fields = form.fields();
    let mut content = Column::new()
        .spacing(12)
        .max_width(600)
        .push(text(if form.is_edit() { "Edit Video" } else { "Upload Video" }).size(26));

    match &form.draft {
        Draft::Create(draft) => {
            let path = draft
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            content = content.push(
                text_input("Video file path", &path)
                    .on_input(AppMessage::FilePathChanged)
                    .padding(8),
            );
        }
        Draft::Edit(draft) if !draft.loaded && form.error.is_none() => {
            content = content.push(text("Loading video..."));
        }
        Draft::Edit(_) => {}
    }

    content = content
        .push(text_input("Title", &fields.title).on_input(AppMessage::TitleChanged).padding(8))
        .push(
            text_input("Description", &fields.description)
                .on_input(AppMessage::DescriptionChanged)
                .padding(8),
        )
        .push(
            text_input("Tags (comma separated)", &fields.tags)
                .on_input(AppMessage::TagsChanged)
                .on_submit(AppMessage::SubmitVideo)
                .padding(8),
        )
        .push(notice(&form.error));

    let submit = button(if form.is_edit() { "Save Changes" } else { "Upload" })
        .padding(10)
        .on_press(AppMessage::SubmitVideo);

    let actions = match &form.draft {
        Draft::Edit(draft) if draft.confirming_delete => row![
            submit,
            text("Delete this video?"),
            button("Delete").on_press(AppMessage::ConfirmDelete),
            button("Cancel").on_press(AppMessage::CancelDelete),
        ],
        Draft::Edit(draft) => row![
            submit,
            button("Delete Video").on_press(AppMessage::RequestDelete(draft.video_id.clone())),
        ],
        Draft::Create(_) => row![submit],
    };

    content.push(actions.spacing(10)).into()
}

fn view_login(form: &LoginForm) -> Element<'_, AppMessage> {
    column![
        text("Login").size(26),
        text_input("Email", &form.email).on_input(AppMessage::EmailChanged).padding(8),
        text_input("Password", &form.password)
            .on_input(AppMessage::PasswordChanged)
            .on_submit(AppMessage::SubmitLogin)
            .secure(true)
            .padding(8),
        notice(&form.error),
        button("Login").padding(10).on_press(AppMessage::SubmitLogin),
    ]
    .spacing(12)
    .max_width(400)
    .into()
}

fn view_register(form: &RegisterForm) -> Element<'_, AppMessage> {
    column![
        text("Register").size(26),
        text_input("Name", &form.name).on_input(AppMessage::NameChanged).padding(8),
        text_input("Email", &form.email).on_input(AppMessage::EmailChanged).padding(8),
        text_input("Password", &form.password)
            .on_input(AppMessage::PasswordChanged)
            .on_submit(AppMessage::SubmitRegister)
            .secure(true)
            .padding(8),
        notice(&form.error),
        button("Register").padding(10).on_press(AppMessage::SubmitRegister),
    ]
    .spacing(12)
    .max_width(400)
    .into()
}

fn view_profile(profile: &Profile) -> Element<'_, AppMessage> {
    let session = &profile.session;
    let avatar = session.initial().map(String::from).unwrap_or_default();

    let details: Element<'_, AppMessage> = match &profile.editing {
        Some(draft) => column![
            text_input("Enter your name", &draft.name)
                .on_input(AppMessage::NameChanged)
                .padding(8),
            text_input("Tell us about yourself...", &draft.bio)
                .on_input(AppMessage::BioChanged)
                .padding(8),
            text_input("Your website URL", &draft.website)
                .on_input(AppMessage::WebsiteChanged)
                .padding(8),
            row![
                button("Save Changes").on_press(AppMessage::SaveProfile),
                button("Cancel").on_press(AppMessage::CancelProfileEdit),
            ]
            .spacing(10),
        ]
        .spacing(8)
        .into(),
        None => column![
            text(session.display_name()).size(26),
            text(&session.email),
            text(
                session
                    .bio
                    .as_deref()
                    .unwrap_or("No bio yet. Tell us about yourself!")
            ),
            text(session.website.as_deref().unwrap_or_default()),
            button("Edit Profile").on_press(AppMessage::EditProfile),
        ]
        .spacing(8)
        .into(),
    };

    let stats = row![
        text(format!("{} Videos", format_count(profile.stats.videos as u64))),
        text(format!("{} Likes", format_count(profile.stats.likes as u64))),
        text(format!("{} Views", format_count(profile.stats.views))),
    ]
    .spacing(30);

    let tab_button = |label: &'static str, tab: Tab| {
        let b = button(label).padding(8);
        if profile.tab == tab {
            b
        } else {
            b.on_press(AppMessage::SelectTab(tab))
        }
    };
    let tabs = row![
        tab_button("Overview", Tab::Overview),
        tab_button("My Videos", Tab::Videos),
        tab_button("Analytics", Tab::Analytics),
    ]
    .spacing(10);

    let tab_content: Element<'_, AppMessage> = if let Some(banner) =
        phase_banner(&profile.phase, "Loading profile...", "No recent activity. Start by uploading your first video!")
    {
        banner
    } else {
        match profile.tab {
            Tab::Overview => Column::with_children(profile.recent_activity().iter().map(|v| {
                text(format!(
                    "You uploaded \"{}\" · {}",
                    v.title,
                    format_date(v.uploaded_at)
                ))
                .into()
            }))
            .spacing(6)
            .into(),
            Tab::Videos => Column::with_children(profile.videos.iter().map(|v| {
                text(format!(
                    "{} · {} likes · {} views",
                    v.title,
                    v.like_count(),
                    v.view_count()
                ))
                .into()
            }))
            .spacing(6)
            .into(),
            Tab::Analytics => column![
                text(format!("Total videos: {}", profile.stats.videos)),
                text(format!("Total likes: {}", profile.stats.likes)),
                text(format!("Total views: {}", profile.stats.views)),
            ]
            .spacing(6)
            .into(),
        }
    };

    column![
        row![text(avatar).size(40), details].spacing(20),
        notice(&profile.notice),
        stats,
        tabs,
        tab_content,
    ]
    .spacing(16)
    .into()
}

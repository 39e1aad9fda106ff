/// Navigable views of the client.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Login,
    Register,
    Upload,
    Edit(String),
    MyVideos,
    Profile,
}

impl Route {
    /// Unknown paths fall back to `Home`.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/upload" => Route::Upload,
            "/my-videos" => Route::MyVideos,
            "/profile" => Route::Profile,
            other => match other.strip_prefix("/edit/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Route::Edit(id.to_string()),
                _ => Route::Home,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Upload => "/upload".to_string(),
            Route::Edit(id) => format!("/edit/{}", id),
            Route::MyVideos => "/my-videos".to_string(),
            Route::Profile => "/profile".to_string(),
        }
    }
}

use crate::models::Session;
use crate::routes::Route;
use crate::storage::SessionStore;

#[derive(Clone, Debug, PartialEq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

fn item(label: &'static str, route: Route) -> NavItem {
    NavItem { label, route }
}

/// Menu entries for the current session state.
pub fn menu(session: Option<&Session>) -> Vec<NavItem> {
    let mut items = vec![
        item("Home", Route::Home),
        item("Upload", Route::Upload),
        item("My Videos", Route::MyVideos),
    ];
    match session {
        Some(_) => items.push(item("Profile", Route::Profile)),
        None => {
            items.push(item("Login", Route::Login));
            items.push(item("Register", Route::Register));
        }
    }
    items
}

/// Forgets the session and returns to the feed.
pub fn logout(sessions: &dyn SessionStore) -> Route {
    if let Err(e) = sessions.clear() {
        log::warn!("failed to clear session: {:?}", e);
    }
    Route::Home
}

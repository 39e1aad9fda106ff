use super::{require, Context};
use crate::client::Pending;
use crate::error::{ApiResult, Precondition};
use crate::models::{Credentials, Registration, Session};
use crate::routes::Route;

#[derive(Clone)]
pub struct LoginForm {
    ctx: Context,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new(ctx: &Context) -> Self {
        LoginForm {
            ctx: ctx.clone(),
            email: String::new(),
            password: String::new(),
            error: None,
        }
    }

    pub fn submit(&mut self) -> Result<Pending<Session>, Precondition> {
        self.error = None;
        let checked = require(&self.email, "Email").and_then(|_| require(&self.password, "Password"));
        if let Err(rejected) = checked {
            self.error = Some(rejected.to_string());
            return Err(rejected);
        }
        Ok(self.ctx.backend.login(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }))
    }

    /// Persists the returned session and heads home.
    pub fn finished(&mut self, result: ApiResult<Session>) -> Option<Route> {
        let session = match result {
            Ok(session) => session,
            Err(e) => {
                self.error = Some(e.user_message());
                return None;
            }
        };
        if let Err(e) = self.ctx.sessions.save(&session) {
            log::warn!("could not persist session: {:?}", e);
            self.error = Some("Could not save your session".to_string());
            return None;
        }
        self.password.clear();
        Some(Route::Home)
    }
}

#[derive(Clone)]
pub struct RegisterForm {
    ctx: Context,
    pub name: String,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
}

impl RegisterForm {
    pub fn new(ctx: &Context) -> Self {
        RegisterForm {
            ctx: ctx.clone(),
            name: String::new(),
            email: String::new(),
            password: String::new(),
            error: None,
        }
    }

    pub fn submit(&mut self) -> Result<Pending<String>, Precondition> {
        self.error = None;
        let checked = require(&self.name, "Name")
            .and_then(|_| require(&self.email, "Email"))
            .and_then(|_| require(&self.password, "Password"));
        if let Err(rejected) = checked {
            self.error = Some(rejected.to_string());
            return Err(rejected);
        }
        Ok(self.ctx.backend.register(Registration {
            email: self.email.trim().to_string(),
            name: self.name.trim().to_string(),
            password: self.password.clone(),
        }))
    }

    /// Registration does not log in: success leads to the login page with
    /// the backend's message.
    pub fn finished(&mut self, result: ApiResult<String>) -> Option<(Route, String)> {
        match result {
            Ok(message) => Some((Route::Login, message)),
            Err(e) => {
                self.error = Some(e.user_message());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::storage::{MemorySessionStore, SessionStore};
    use crate::testing::FakeBackend;
    use std::sync::Arc;

    fn setup() -> (Arc<FakeBackend>, Arc<MemorySessionStore>, Context) {
        let backend = Arc::new(
            FakeBackend::new().with_user("alice@example.com", "Alice", "hunter2"),
        );
        let store = Arc::new(MemorySessionStore::new());
        let ctx = Context::new(backend.clone(), store.clone());
        (backend, store, ctx)
    }

    #[tokio::test]
    async fn test_login_persists_session_and_goes_home() {
        let (_, store, ctx) = setup();
        let mut form = LoginForm::new(&ctx);
        form.email = "alice@example.com".to_string();
        form.password = "hunter2".to_string();

        let call = form.submit().unwrap();
        assert_eq!(form.finished(call.await), Some(Route::Home));

        let session = store.load().unwrap();
        assert_eq!(session.email, "alice@example.com");
        assert_eq!(session.name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_bad_credentials_show_backend_error() {
        let (_, store, ctx) = setup();
        let mut form = LoginForm::new(&ctx);
        form.email = "alice@example.com".to_string();
        form.password = "wrong".to_string();

        let call = form.submit().unwrap();
        assert_eq!(form.finished(call.await), None);
        assert_eq!(form.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_empty_login_fields_make_no_call() {
        let (backend, _, ctx) = setup();
        let mut form = LoginForm::new(&ctx);
        form.email = "alice@example.com".to_string();

        assert_eq!(form.submit().err(), Some(Precondition::Missing("Password")));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_transport_failure_is_generic() {
        let (backend, _, ctx) = setup();
        backend.fail_with(ApiError::Transport("timed out".to_string()));
        let mut form = LoginForm::new(&ctx);
        form.email = "alice@example.com".to_string();
        form.password = "hunter2".to_string();

        let call = form.submit().unwrap();
        assert_eq!(form.finished(call.await), None);
        assert_eq!(form.error.as_deref(), Some("Something went wrong"));
    }

    #[tokio::test]
    async fn test_register_goes_to_login_without_session() {
        let (_, store, ctx) = setup();
        let mut form = RegisterForm::new(&ctx);
        form.name = "Bob".to_string();
        form.email = "bob@example.com".to_string();
        form.password = "pw".to_string();

        let call = form.submit().unwrap();
        let (route, message) = form.finished(call.await).unwrap();
        assert_eq!(route, Route::Login);
        assert_eq!(message, "User registered successfully");
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_rejected() {
        let (_, _, ctx) = setup();
        let mut form = RegisterForm::new(&ctx);
        form.name = "Alice".to_string();
        form.email = "alice@example.com".to_string();
        form.password = "pw".to_string();

        let call = form.submit().unwrap();
        assert!(form.finished(call.await).is_none());
        assert_eq!(form.error.as_deref(), Some("Email already registered"));
    }
}

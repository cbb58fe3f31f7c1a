//! Signed-in user session: durable `token`/`userData`, a reducer-driven state
//! and a watch channel for render-on-change.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use course_core::model::{Credentials, Registration, User};
use storage::{KeyValueStore, TOKEN_KEY, USER_DATA_KEY};

use crate::api::{AuthSession, LearningApi};
use crate::error::{ApiError, SessionError};

//
// ─── TOKEN HANDLE ──────────────────────────────────────────────────────────────
//

/// Bearer token shared between the session and the HTTP client.
#[derive(Clone, Default)]
pub struct TokenHandle(Arc<RwLock<Option<String>>>);

impl TokenHandle {
    #[must_use]
    pub fn get(&self) -> Option<String> {
        match self.0.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, token: Option<String>) {
        match self.0.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }
}

impl std::fmt::Debug for TokenHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TokenHandle")
            .field(&if self.is_set() { "<set>" } else { "<none>" })
            .finish()
    }
}

//
// ─── STATE + REDUCER ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Register,
    Google,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    Start(AuthKind),
    Success { kind: AuthKind, user: User },
    Failure { kind: AuthKind, message: String },
    Restored(Option<User>),
    LoggedOut,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub pending: Option<AuthKind>,
    pub error: Option<String>,
    /// Set once `restore` has run.
    pub restored: bool,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

#[must_use]
pub fn reduce(state: &AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::Start(kind) => AuthState {
            pending: Some(kind),
            error: None,
            ..state.clone()
        },
        AuthAction::Success { user, .. } => AuthState {
            user: Some(user),
            pending: None,
            error: None,
            restored: state.restored,
        },
        AuthAction::Failure { message, .. } => AuthState {
            user: None,
            pending: None,
            error: Some(message),
            restored: state.restored,
        },
        AuthAction::Restored(user) => AuthState {
            user,
            pending: None,
            error: None,
            restored: true,
        },
        AuthAction::LoggedOut => AuthState {
            restored: state.restored,
            ..AuthState::default()
        },
    }
}

//
// ─── CONTEXT ───────────────────────────────────────────────────────────────────
//

/// Explicit session object, injected where it is needed.
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn LearningApi>,
    token: TokenHandle,
    state: watch::Sender<AuthState>,
}

impl SessionContext {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, api: Arc<dyn LearningApi>, token: TokenHandle) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            store,
            api,
            token,
            state,
        }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn token(&self) -> TokenHandle {
        self.token.clone()
    }

    fn dispatch(&self, action: AuthAction) {
        self.state.send_modify(|state| *state = reduce(state, action));
    }

    /// Rebuild the session from durable storage at process start.
    ///
    /// Both `token` and `userData` must be present and `userData` must
    /// decode; otherwise both keys are cleared and the user is signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be read or cleared.
    pub async fn restore(&self) -> Result<Option<User>, SessionError> {
        let token = self.store.get(TOKEN_KEY).await?;
        let user_data = self.store.get(USER_DATA_KEY).await?;

        let user = match (token, user_data) {
            (Some(token), Some(raw)) if !token.trim().is_empty() => {
                match serde_json::from_str::<User>(&raw) {
                    Ok(user) => {
                        self.token.set(Some(token));
                        Some(user)
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "stored user data is unreadable");
                        None
                    }
                }
            }
            _ => None,
        };

        match &user {
            Some(user) => tracing::info!(user_id = %user.id, "session restored"),
            None => self.clear().await?,
        }
        self.dispatch(AuthAction::Restored(user.clone()));
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Credentials` on invalid input (no request is
    /// made), `SessionError::Api` when the server rejects the login, and
    /// `SessionError::Storage` if the session cannot be saved.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let kind = AuthKind::Login;
        let credentials = self.validate(kind, Credentials::new(email, password))?;
        self.dispatch(AuthAction::Start(kind));
        let result = self
            .api
            .login(credentials.email(), credentials.password())
            .await;
        self.finish(kind, result).await
    }

    /// # Errors
    ///
    /// Same as [`SessionContext::login`].
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, SessionError> {
        let kind = AuthKind::Register;
        let registration = self.validate(kind, Registration::new(name, email, password))?;
        self.dispatch(AuthAction::Start(kind));
        let result = self
            .api
            .register(
                registration.name(),
                registration.email(),
                registration.password(),
            )
            .await;
        self.finish(kind, result).await
    }

    /// Exchange a Google identity token for a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MissingIdentityToken` for a blank token and
    /// otherwise the same errors as [`SessionContext::login`].
    pub async fn google_login(&self, id_token: &str) -> Result<User, SessionError> {
        let kind = AuthKind::Google;
        let id_token = id_token.trim();
        if id_token.is_empty() {
            let err = SessionError::MissingIdentityToken;
            self.dispatch(AuthAction::Failure {
                kind,
                message: err.user_message(),
            });
            return Err(err);
        }
        self.dispatch(AuthAction::Start(kind));
        let result = self.api.google_login(id_token).await;
        self.finish(kind, result).await
    }

    /// Sign out: drop both durable keys and reset state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the keys cannot be removed; the
    /// in-memory session is cleared regardless.
    pub async fn invalidate(&self) -> Result<(), SessionError> {
        let cleared = self.clear().await;
        self.dispatch(AuthAction::LoggedOut);
        tracing::info!("signed out");
        cleared
    }

    fn validate<T>(
        &self,
        kind: AuthKind,
        input: Result<T, course_core::model::CredentialsError>,
    ) -> Result<T, SessionError> {
        input.map_err(|err| {
            self.dispatch(AuthAction::Failure {
                kind,
                message: err.to_string(),
            });
            SessionError::Credentials(err)
        })
    }

    async fn finish(
        &self,
        kind: AuthKind,
        result: Result<AuthSession, ApiError>,
    ) -> Result<User, SessionError> {
        let outcome = match result {
            Ok(session) => self.persist(session).await,
            Err(err) => Err(SessionError::Api(err)),
        };
        match outcome {
            Ok(user) => {
                tracing::info!(user_id = %user.id, ?kind, "signed in");
                self.dispatch(AuthAction::Success {
                    kind,
                    user: user.clone(),
                });
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(?kind, error = %err, "sign-in failed");
                self.dispatch(AuthAction::Failure {
                    kind,
                    message: err.user_message(),
                });
                Err(err)
            }
        }
    }

    async fn persist(&self, session: AuthSession) -> Result<User, SessionError> {
        let user_data = serde_json::to_string(&session.user)?;
        self.store.set(TOKEN_KEY, &session.token).await?;
        self.store.set(USER_DATA_KEY, &user_data).await?;
        self.token.set(Some(session.token));
        Ok(session.user)
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.token.set(None);
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(USER_DATA_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::UserId;

    fn user() -> User {
        User {
            id: UserId::new("u1").unwrap(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            avatar_url: None,
        }
    }

    #[test]
    fn start_clears_previous_error_and_marks_pending() {
        let failed = reduce(
            &AuthState::default(),
            AuthAction::Failure {
                kind: AuthKind::Login,
                message: "nope".into(),
            },
        );
        let started = reduce(&failed, AuthAction::Start(AuthKind::Login));
        assert!(started.is_loading());
        assert_eq!(started.error, None);
    }

    #[test]
    fn success_then_logout_keeps_restored_flag() {
        let restored = reduce(&AuthState::default(), AuthAction::Restored(None));
        let signed_in = reduce(
            &restored,
            AuthAction::Success {
                kind: AuthKind::Google,
                user: user(),
            },
        );
        assert!(signed_in.is_authenticated());
        assert!(signed_in.restored);

        let signed_out = reduce(&signed_in, AuthAction::LoggedOut);
        assert!(!signed_out.is_authenticated());
        assert!(signed_out.restored);
    }

    #[test]
    fn token_handle_is_shared_between_clones() {
        let handle = TokenHandle::default();
        let other = handle.clone();
        handle.set(Some("secret".into()));
        assert_eq!(other.get().as_deref(), Some("secret"));
        assert_eq!(format!("{other:?}"), "TokenHandle(\"<set>\")");
    }
}

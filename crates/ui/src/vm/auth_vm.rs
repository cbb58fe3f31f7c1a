use services::{AuthKind, AuthState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

impl AuthMode {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign in",
            AuthMode::SignUp => "Create an account",
        }
    }

    #[must_use]
    pub fn toggle_label(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Need an account? Sign up",
            AuthMode::SignUp => "Already registered? Sign in",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        }
    }
}

#[must_use]
pub fn submit_label(mode: AuthMode, state: &AuthState) -> &'static str {
    match (mode, state.pending) {
        (_, Some(AuthKind::Google)) => "Waiting for Google...",
        (AuthMode::SignIn, Some(_)) => "Signing in...",
        (AuthMode::SignUp, Some(_)) => "Creating account...",
        (AuthMode::SignIn, None) => "Sign in",
        (AuthMode::SignUp, None) => "Sign up",
    }
}

/// Sidebar greeting, `None` when signed out.
#[must_use]
pub fn greeting(state: &AuthState) -> Option<String> {
    state.user.as_ref().map(|user| format!("Hi, {}", user.name))
}

//! Session state consulted by the authentication guard.
//!
//! Only the locally held session is modelled here. Issuing and verifying
//! tokens is the identity provider's job; the guard just asks whether there is
//! a session and the resource client forwards its token.

/// Current authentication status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    LoggedOut,
    LoggedIn {
        username: String,
        token: Option<String>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    status: AuthStatus,
    /// Incremented on every login/logout so holders can notice a changed session.
    epoch: u64,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that starts signed in, e.g. from a configured token.
    pub fn logged_in(username: impl Into<String>, token: Option<String>) -> Self {
        let mut state = Self::new();
        state.login_success(username, token);
        state
    }

    pub fn status(&self) -> &AuthStatus {
        &self.status
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.status, AuthStatus::LoggedIn { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match &self.status {
            AuthStatus::LoggedIn { username, .. } => Some(username),
            AuthStatus::LoggedOut => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.status {
            AuthStatus::LoggedIn { token, .. } => token.as_deref(),
            AuthStatus::LoggedOut => None,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn login_success(&mut self, username: impl Into<String>, token: Option<String>) {
        self.status = AuthStatus::LoggedIn {
            username: username.into(),
            token: token.filter(|t| !t.is_empty()),
        };
        self.epoch += 1;
    }

    pub fn logout(&mut self) {
        if self.is_logged_in() {
            self.status = AuthStatus::LoggedOut;
            self.epoch += 1;
        }
    }
}

//! Everything a page needs from its surroundings, passed in explicitly.

use std::sync::Arc;

use admin_business::{AdminConfig, AuthState, CrudError, HttpResourceClient, ResourceClient};
use log::info;
use tokio::runtime::Handle;

use crate::theme::Theme;

/// Session name used when the session comes from `ADMIN_TOKEN`.
const TOKEN_SESSION_USER: &str = "api-token";

pub struct PageContext {
    pub theme: Theme,
    pub auth: AuthState,
    config: AdminConfig,
    runtime: Handle,
}

impl PageContext {
    /// A configured token signs the session in right away.
    pub fn new(config: AdminConfig, runtime: Handle) -> Self {
        let auth = match config.token() {
            Some(token) => {
                info!("Session started from configured token");
                AuthState::logged_in(TOKEN_SESSION_USER, Some(token.to_owned()))
            }
            None => AuthState::new(),
        };
        Self {
            theme: Theme::default(),
            auth,
            config,
            runtime,
        }
    }

    /// Context against a local test server, on the current tokio runtime.
    pub fn test(base_url: impl Into<String>) -> Self {
        Self::new(AdminConfig::new(base_url), Handle::current())
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// HTTP client for the current session.
    pub fn resource_client(&self) -> Result<Arc<dyn ResourceClient>, CrudError> {
        let client = HttpResourceClient::from_config(&self.config)?
            .with_token(self.auth.token().map(str::to_owned));
        Ok(Arc::new(client))
    }
}

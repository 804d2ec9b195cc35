//! Authentication guard.
//!
//! `auth_guard` wraps a render callback and hands back a gated one. The gated
//! callback renders the original when a session exists and a sign-in prompt
//! otherwise. It never mutates the session itself: a submitted prompt comes
//! back as a [`SignInRequest`] for the caller to apply.

use admin_business::AuthState;
use egui::{Button, RichText, TextEdit, Ui};

use crate::theme::Theme;

/// Text typed into the sign-in prompt, kept across frames.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub username: String,
    pub token: String,
}

impl SignInForm {
    fn can_submit(&self) -> bool {
        !self.username.trim().is_empty()
    }

    fn take_request(&mut self) -> SignInRequest {
        let request = SignInRequest {
            username: self.username.trim().to_owned(),
            token: Some(self.token.trim().to_owned()).filter(|t| !t.is_empty()),
        };
        self.token.clear();
        request
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRequest {
    pub username: String,
    pub token: Option<String>,
}

impl SignInRequest {
    pub fn apply(self, auth: &mut AuthState) {
        log::info!("Signed in as {}", self.username);
        auth.login_success(self.username, self.token);
    }
}

/// What the gated callback did this frame.
#[derive(Debug)]
pub enum Gate<T> {
    Open(T),
    Blocked { sign_in: Option<SignInRequest> },
}

impl<T> Gate<T> {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

pub fn auth_guard<'a, T>(
    auth: &'a AuthState,
    form: &'a mut SignInForm,
    theme: &'a Theme,
    render: impl FnOnce(&mut Ui) -> T + 'a,
) -> impl FnOnce(&mut Ui) -> Gate<T> + 'a {
    move |ui| {
        if auth.is_logged_in() {
            Gate::Open(render(ui))
        } else {
            Gate::Blocked {
                sign_in: sign_in_prompt(ui, form, theme),
            }
        }
    }
}

fn sign_in_prompt(ui: &mut Ui, form: &mut SignInForm, theme: &Theme) -> Option<SignInRequest> {
    let mut request = None;

    ui.vertical(|ui| {
        ui.heading("Sign in required");
        ui.label(RichText::new("This page needs an active session.").color(theme.muted));
        ui.add_space(theme.spacing);

        ui.horizontal(|ui| {
            ui.label("Username:");
            ui.add(TextEdit::singleline(&mut form.username).desired_width(200.0));
        });
        ui.horizontal(|ui| {
            ui.label("Token:");
            ui.add(
                TextEdit::singleline(&mut form.token)
                    .password(true)
                    .desired_width(200.0),
            );
        });
        ui.add_space(theme.spacing);

        if ui
            .add_enabled(form.can_submit(), Button::new("Sign in"))
            .clicked()
        {
            request = Some(form.take_request());
        }
    });

    request
}

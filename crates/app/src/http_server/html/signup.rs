use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use common::prelude::CredentialError;

use crate::session::{Flash, Session};
use crate::AppState;

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub username: Option<String>,
    pub flash: Flash,
    /// Inline error rendered on a rejected registration.
    pub error: Option<String>,
    /// Re-fill value for the username field.
    pub signup_username: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
}

#[instrument(skip(session))]
pub async fn form(mut session: Session) -> askama_axum::Response {
    let username = session.username();
    let flash = session.take_flash();

    let template = SignupTemplate {
        username,
        flash,
        error: None,
        signup_username: String::new(),
    };

    (session, template).into_response()
}

// `form` is skipped so the password never reaches the logs.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<SignupForm>,
) -> askama_axum::Response {
    match state.credentials().register(&form.username, &form.password) {
        Ok(()) => {
            session.flash_message("Your account has been created. Please sign in.");
            (session, Redirect::to("/users/login")).into_response()
        }
        Err(
            e @ (CredentialError::UsernameRequired
            | CredentialError::PasswordRequired
            | CredentialError::UsernameTaken),
        ) => {
            let username = session.username();
            let flash = session.take_flash();
            let template = SignupTemplate {
                username,
                flash,
                error: Some(e.to_string()),
                signup_username: form.username,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, session, template).into_response()
        }
        Err(e) => {
            tracing::error!("registration failed: {}", e);
            super::internal_error()
        }
    }
}

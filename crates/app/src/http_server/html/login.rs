use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use crate::session::{Flash, Session};
use crate::AppState;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub username: Option<String>,
    pub flash: Flash,
    /// Inline error rendered on a failed attempt.
    pub error: Option<String>,
    /// Re-fill value for the username field.
    pub login_username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[instrument(skip(session))]
pub async fn form(mut session: Session) -> askama_axum::Response {
    let username = session.username();
    let flash = session.take_flash();

    let template = LoginTemplate {
        username,
        flash,
        error: None,
        login_username: String::new(),
    };

    (session, template).into_response()
}

// `form` is skipped so the password never reaches the logs.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> askama_axum::Response {
    match state.credentials().verify(&form.username, &form.password) {
        Ok(true) => {
            session.sign_in(&form.username);
            session.flash_message("Welcome!");
            (session, Redirect::to("/")).into_response()
        }
        Ok(false) => {
            let username = session.username();
            let flash = session.take_flash();
            let template = LoginTemplate {
                username,
                flash,
                error: Some("invalid credentials".to_string()),
                login_username: form.username,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, session, template).into_response()
        }
        Err(e) => {
            tracing::error!("credential verification failed: {}", e);
            super::internal_error()
        }
    }
}

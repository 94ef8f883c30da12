use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use tracing::instrument;

use crate::session::{Flash, Session};
use crate::AppState;

#[derive(Template)]
#[template(path = "new.html")]
pub struct NewDocumentTemplate {
    pub username: Option<String>,
    pub flash: Flash,
    /// Inline error rendered on a rejected creation.
    pub error: Option<String>,
    /// Re-fill value for the name field.
    pub name: String,
}

#[instrument(skip(state, session))]
pub async fn handler(State(state): State<AppState>, mut session: Session) -> askama_axum::Response {
    if !super::authorized(&state, &session) {
        return super::deny(session);
    }

    let username = session.username();
    let flash = session.take_flash();

    let template = NewDocumentTemplate {
        username,
        flash,
        error: None,
        name: String::new(),
    };

    (session, template).into_response()
}

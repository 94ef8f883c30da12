use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use tracing::instrument;

use crate::session::{Flash, Session};
use crate::AppState;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub username: Option<String>,
    pub flash: Flash,
    pub documents: Vec<String>,
    pub can_manage: bool,
}

#[instrument(skip(state, session))]
pub async fn handler(State(state): State<AppState>, mut session: Session) -> askama_axum::Response {
    let documents = match state.documents().list() {
        Ok(documents) => documents,
        Err(e) => {
            tracing::error!("failed to list documents: {}", e);
            return super::internal_error();
        }
    };

    let username = session.username();
    let can_manage = state.policy().can_manage_documents(username.as_deref());
    let flash = session.take_flash();

    let template = IndexTemplate {
        username,
        flash,
        documents,
        can_manage,
    };

    (session, template).into_response()
}

use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Redirect;
use tracing::instrument;

use common::prelude::{render, DocumentError, RenderedDocument};

use crate::session::{Flash, Session};
use crate::AppState;

#[derive(Template)]
#[template(path = "document.html")]
pub struct DocumentTemplate {
    pub username: Option<String>,
    pub flash: Flash,
    pub name: String,
    /// Pre-rendered HTML body, inserted unescaped.
    pub body: String,
    pub can_manage: bool,
}

#[instrument(skip(state, session))]
pub async fn handler(
    State(state): State<AppState>,
    mut session: Session,
    Path(file): Path<String>,
) -> askama_axum::Response {
    let content = match state.documents().read(&file) {
        Ok(content) => content,
        Err(
            e @ (DocumentError::NotFound(_)
            | DocumentError::InvalidName(_)
            | DocumentError::NameRequired),
        ) => {
            session.flash_error(e.to_string());
            return (session, Redirect::to("/")).into_response();
        }
        Err(e) => {
            tracing::error!("failed to read document: {}", e);
            return super::internal_error();
        }
    };

    match render(&file, &content) {
        RenderedDocument::Html(body) => {
            let username = session.username();
            let can_manage = state.policy().can_manage_documents(username.as_deref());
            let flash = session.take_flash();
            let template = DocumentTemplate {
                username,
                flash,
                name: file,
                body,
                can_manage,
            };
            (session, template).into_response()
        }
        RenderedDocument::PlainText(text) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
    }
}

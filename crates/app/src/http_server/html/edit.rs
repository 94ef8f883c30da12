use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Form;
use http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use common::prelude::{DocumentError, DocumentStore};

use crate::session::{Flash, Session};
use crate::AppState;

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub username: Option<String>,
    pub flash: Flash,
    pub name: String,
    pub content: String,
    /// Inline error rendered on a rejected save.
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub content: String,
}

#[instrument(skip(state, session))]
pub async fn form(
    State(state): State<AppState>,
    mut session: Session,
    Path(file): Path<String>,
) -> askama_axum::Response {
    if !super::authorized(&state, &session) {
        return super::deny(session);
    }

    // Only documents with a recognized extension are editable through the
    // UI, even when other files are present in the directory.
    if !DocumentStore::extension_allowed(&file) {
        session.flash_error(format!("{} cannot be edited", file));
        return (session, Redirect::to("/")).into_response();
    }

    match state.documents().read(&file) {
        Ok(content) => {
            let username = session.username();
            let flash = session.take_flash();
            let template = EditTemplate {
                username,
                flash,
                name: file,
                content: String::from_utf8_lossy(&content).into_owned(),
                error: None,
            };
            (session, template).into_response()
        }
        Err(
            e @ (DocumentError::NotFound(_)
            | DocumentError::InvalidName(_)
            | DocumentError::NameRequired),
        ) => {
            session.flash_error(e.to_string());
            (session, Redirect::to("/")).into_response()
        }
        Err(e) => {
            tracing::error!("failed to read document: {}", e);
            super::internal_error()
        }
    }
}

#[instrument(skip(state, session, form))]
pub async fn save(
    State(state): State<AppState>,
    mut session: Session,
    Path(file): Path<String>,
    Form(form): Form<EditForm>,
) -> askama_axum::Response {
    if !super::authorized(&state, &session) {
        return super::deny(session);
    }

    if !DocumentStore::extension_allowed(&file) {
        let username = session.username();
        let flash = session.take_flash();
        let template = EditTemplate {
            username,
            flash,
            name: file,
            content: form.content,
            error: Some("Please use a valid extension (.txt or .md).".to_string()),
        };
        return (StatusCode::UNPROCESSABLE_ENTITY, session, template).into_response();
    }

    match state.documents().write(&file, form.content.as_bytes()) {
        Ok(()) => {
            session.flash_message(format!("{} has been updated.", file));
            (session, Redirect::to("/")).into_response()
        }
        Err(e @ (DocumentError::InvalidName(_) | DocumentError::NameRequired)) => {
            session.flash_error(e.to_string());
            (session, Redirect::to("/")).into_response()
        }
        Err(e) => {
            tracing::error!("failed to write document: {}", e);
            super::internal_error()
        }
    }
}

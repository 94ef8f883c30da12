use askama_axum::IntoResponse;
use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use common::prelude::DocumentError;

use super::new::NewDocumentTemplate;
use crate::session::Session;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    pub name: String,
}

#[instrument(skip(state, session))]
pub async fn handler(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<CreateForm>,
) -> askama_axum::Response {
    if !super::authorized(&state, &session) {
        return super::deny(session);
    }

    match state.documents().create(&form.name) {
        Ok(()) => {
            session.flash_message(format!("{} has been created.", form.name));
            (session, Redirect::to("/")).into_response()
        }
        Err(
            e @ (DocumentError::NameRequired
            | DocumentError::UnsupportedExtension(_)
            | DocumentError::InvalidName(_)),
        ) => {
            let username = session.username();
            let flash = session.take_flash();
            let template = NewDocumentTemplate {
                username,
                flash,
                error: Some(e.to_string()),
                name: form.name,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, session, template).into_response()
        }
        Err(e) => {
            tracing::error!("failed to create document: {}", e);
            super::internal_error()
        }
    }
}

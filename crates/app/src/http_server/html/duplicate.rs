use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use tracing::instrument;

use common::prelude::DocumentError;

use crate::session::Session;
use crate::AppState;

#[instrument(skip(state, session))]
pub async fn handler(
    State(state): State<AppState>,
    mut session: Session,
    Path(file): Path<String>,
) -> Response {
    if !super::authorized(&state, &session) {
        return super::deny(session);
    }

    match state.documents().duplicate(&file) {
        Ok(_copy) => {
            session.flash_message(format!("{} has been duplicated", file));
            (session, Redirect::to("/")).into_response()
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
            tracing::error!("failed to duplicate document: {}", e);
            super::internal_error()
        }
    }
}

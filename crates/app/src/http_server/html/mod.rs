use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use http::StatusCode;

mod create;
mod delete;
mod duplicate;
mod edit;
mod index;
mod login;
mod new;
mod signout;
mod signup;
mod view;

use crate::session::Session;
use crate::AppState;

/// Message shown when an unauthorized request hits a protected route.
const SIGN_IN_REQUIRED: &str = "You must be signed in to do that";

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(index::handler))
        .route("/users/login", get(login::form).post(login::submit))
        .route("/users/signout", post(signout::handler))
        .route("/users/signup", get(signup::form).post(signup::submit))
        .route("/new", get(new::handler))
        .route("/create", post(create::handler))
        .route("/:file", get(view::handler).post(edit::save))
        .route("/:file/edit", get(edit::form))
        .route("/:file/delete", post(delete::handler))
        .route("/:file/duplicate", post(duplicate::handler))
        .with_state(state)
}

/// Whether the session's identity may perform document mutations.
fn authorized(state: &AppState, session: &Session) -> bool {
    let username = session.username();
    state.policy().can_manage_documents(username.as_deref())
}

/// Deny a protected route: queue the one-shot error and redirect home
/// without performing the requested action.
fn deny(mut session: Session) -> Response {
    session.flash_error(SIGN_IN_REQUIRED);
    (session, Redirect::to("/")).into_response()
}

/// Store-level failures the handler layer does not map to a user-facing
/// message end up here: logged by the caller, opaque to the client.
fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error").into_response()
}

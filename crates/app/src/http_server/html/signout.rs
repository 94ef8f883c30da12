use axum::response::{IntoResponse, Redirect, Response};
use tracing::instrument;

use crate::session::Session;

#[instrument(skip(session))]
pub async fn handler(mut session: Session) -> Response {
    session.sign_out();
    session.flash_message("You have been signed out");
    (session, Redirect::to("/")).into_response()
}

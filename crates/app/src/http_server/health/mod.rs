use axum::routing::get;
use axum::Router;

mod healthz;
mod versionz;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz::handler))
        .route("/versionz", get(versionz::handler))
}

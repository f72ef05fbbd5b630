use crate::modules::auth::controller::{change_password, login, signup};
use crate::state::AppState;
use axum::{Router, routing::post};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/change-password", post(change_password))
}

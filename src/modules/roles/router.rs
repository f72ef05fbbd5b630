use crate::modules::roles::controller::{create_role, get_role, get_role_by_name, get_roles};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_role).get(get_roles))
        .route("/name/{name}", get(get_role_by_name))
        .route("/{id}", get(get_role))
}

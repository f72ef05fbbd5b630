use crate::modules::users::controller::{
    assign_role, get_profile, get_user, get_users, update_profile,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

/// Admin-guarded user management routes.
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/{id}", get(get_user))
        .route("/{id}/role", put(assign_role))
}

/// Routes any authenticated user can reach for their own account.
pub fn init_profile_router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

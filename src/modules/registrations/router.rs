use crate::modules::registrations::controller::{
    cancel_registration, complete_registration, create_registration, get_registration,
    get_registrations,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn init_registrations_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_registration).get(get_registrations))
        .route("/{id}", get(get_registration))
        .route("/{id}/complete", put(complete_registration))
        .route("/{id}/cancel", put(cancel_registration))
}

use crate::modules::school_classes::controller::{
    add_teacher, create_school_class, delete_school_class, get_school_class, get_school_classes,
    remove_teacher, update_school_class,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn init_school_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_school_class).get(get_school_classes))
        .route(
            "/{id}",
            get(get_school_class)
                .put(update_school_class)
                .delete(delete_school_class),
        )
        .route(
            "/{id}/teachers/{teacher_id}",
            put(add_teacher).delete(remove_teacher),
        )
}

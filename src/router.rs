use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::{require_admin, require_teacher};
use crate::modules::attendance::router::init_attendance_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::classrooms::router::init_classrooms_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::exams::router::init_exams_router;
use crate::modules::lessons::router::init_lessons_router;
use crate::modules::registrations::router::init_registrations_router;
use crate::modules::roles::router::init_roles_router;
use crate::modules::school_classes::router::init_school_classes_router;
use crate::modules::subjects::router::init_subjects_router;
use crate::modules::users::router::{init_profile_router, init_users_router};
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    let admin = |router: Router<AppState>| {
        router.route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
    };
    let teacher = |router: Router<AppState>| {
        router.route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_teacher,
        ))
    };

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/profile", init_profile_router())
                .nest("/users", admin(init_users_router()))
                .nest("/roles", admin(init_roles_router()))
                .nest("/classrooms", admin(init_classrooms_router()))
                .nest("/subjects", admin(init_subjects_router()))
                .nest("/courses", admin(init_courses_router()))
                .nest("/school-classes", admin(init_school_classes_router()))
                .nest("/registrations", admin(init_registrations_router()))
                .nest("/lessons", teacher(init_lessons_router()))
                .nest("/exams", teacher(init_exams_router()))
                .nest("/attendance", teacher(init_attendance_router())),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}

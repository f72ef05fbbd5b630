use dotenvy::dotenv;
use markbook::logging::init_tracing;
use markbook::router::init_router;
use markbook::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    init_tracing();

    let state = init_app_state().await;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .expect("Failed to run database migrations");

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind to 0.0.0.0:3000");
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}

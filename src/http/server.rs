use actix_web::{web, App, HttpServer};

use super::handlers::{configure, AppState};

/// Start the HTTP server and run until it is stopped
pub async fn start_server(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    tracing::info!("🚀 Starting order service on http://{}:{}", host, port);

    let state = web::Data::new(state);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host, port))?
        .run()
        .await
}

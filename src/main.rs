//! Main entry point for the backend server.
//!
//! Loads settings, opens the game store and launches the HTTP server with the
//! `/api/games` endpoints.

use actix_web::{App, HttpServer, middleware, web};
use log::{info, warn};

use boardcraft::config::server::Settings;
use boardcraft::server::{auth::JwtKeys, cache::GameListCache, router, state::AppState};
use boardcraft::store::GameStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().map_err(std::io::Error::other)?;
    if settings.uses_dev_secret() {
        warn!("[Server] JWT_SECRET is not set, using the development secret");
    }

    let store = GameStore::open(&settings.database_path).map_err(std::io::Error::other)?;
    info!("[Server] Game store at {}", settings.database_path.display());

    // Shared application state for HTTP handlers.
    let state = web::Data::new(AppState::new(
        store,
        GameListCache::new(),
        JwtKeys::from_secret(&settings.jwt_secret),
    ));

    info!("[Server] Listening on {}:{}", settings.bind, settings.port);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "Authorization, Content-Type"))
                    .add(("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")),
            )
            .app_data(state.clone())
            .configure(router::config)
    })
    .bind((settings.bind.as_str(), settings.port))?
    .run()
    .await
}

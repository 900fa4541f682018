//! HTTP routing configuration.
//!
//! Every game endpoint lives under `/api/games` and requires a bearer token.
//! Unknown `/api` paths answer with the JSON error body instead of an empty 404.

use actix_web::{HttpRequest, HttpResponse, http::Method, http::StatusCode, web};

use crate::server::error::{ApiError, http_error_response};
use crate::server::games;

/// Configure the application's HTTP routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadPayload(err.to_string()).into()),
    )
    .service(
        web::scope("/api/games")
            .service(
                web::resource("")
                    .route(web::get().to(games::list_games))
                    .route(web::post().to(games::create_game))
                    .route(web::method(Method::OPTIONS).to(preflight)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(games::get_game))
                    .route(web::put().to(games::update_game))
                    .route(web::delete().to(games::delete_game))
                    .route(web::method(Method::OPTIONS).to(preflight)),
            ),
    )
    .service(web::scope("/api").default_service(web::to(api_not_found)));
}

/// CORS preflight. The headers themselves come from the `DefaultHeaders` middleware.
async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

async fn api_not_found(req: HttpRequest) -> HttpResponse {
    http_error_response(
        "ROUTE_NOT_FOUND",
        "No such API endpoint",
        Some(req.path()),
        StatusCode::NOT_FOUND,
    )
}

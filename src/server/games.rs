// src/server/games.rs

//! `/api/games` handlers.
//!
//! All handlers require an `AuthUser` and only ever touch that owner's games.
//! Writes invalidate the owner's cached list before responding.

use actix_web::{HttpResponse, http::header::ContentType, web};
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use crate::game::types::GameId;
use crate::server::auth::AuthUser;
use crate::server::error::{ApiError, FieldError};
use crate::server::state::AppState;
use crate::store::{GameChanges, NewGame};

#[derive(Debug, Deserialize)]
pub struct CreateGame {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pieces: Option<Value>,
    #[serde(default)]
    pub rules: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGame {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pieces: Option<Value>,
    #[serde(default)]
    pub rules: Option<String>,
}

impl CreateGame {
    fn validate(self) -> Result<NewGame, ApiError> {
        let title = match self.title {
            Some(title) if !title.is_empty() => title,
            _ => {
                return Err(ApiError::Validation(vec![FieldError {
                    field: "title",
                    msg: "Title is required",
                }]));
            }
        };
        Ok(NewGame {
            title,
            pieces: self.pieces.filter(|p| !is_falsy(p)).unwrap_or_else(|| json!([])),
            rules: self.rules.unwrap_or_default(),
        })
    }
}

impl UpdateGame {
    /// Empty strings and null/false values mean "keep what is stored".
    fn into_changes(self) -> GameChanges {
        GameChanges {
            title: self.title.filter(|t| !t.is_empty()),
            pieces: self.pieces.filter(|p| !is_falsy(p)),
            rules: self.rules.filter(|r| !r.is_empty()),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// A path id that is not a UUID cannot name a stored game.
fn parse_game_id(raw: &str) -> Result<GameId, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(raw))
}

/// GET /api/games
pub async fn list_games(
    user: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let owner = user.id();
    let body = match state.cache.get(&owner).await {
        Some(body) => {
            debug!("[Cache] Hit for owner {}", owner);
            body
        }
        None => {
            debug!("[Cache] Miss for owner {}", owner);
            let store = state.store.clone();
            let games = web::block(move || store.list_by_owner(owner)).await??;
            let body: Arc<str> = Arc::from(serde_json::to_string(&games)?);
            state.cache.insert(owner, body.clone()).await;
            body
        }
    };
    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body.to_string()))
}

/// GET /api/games/{id}
pub async fn get_game(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_game_id(&path)?;
    let owner = user.id();
    let store = state.store.clone();
    let game = web::block(move || store.find(id, owner))
        .await??
        .ok_or_else(|| ApiError::not_found(id))?;
    Ok(HttpResponse::Ok().json(game))
}

/// POST /api/games
pub async fn create_game(
    user: AuthUser,
    state: web::Data<AppState>,
    body: web::Json<CreateGame>,
) -> Result<HttpResponse, ApiError> {
    let new_game = body.into_inner().validate()?;
    let owner = user.id();
    let store = state.store.clone();
    let game = web::block(move || store.create(owner, new_game)).await??;
    state.cache.invalidate(&owner).await;
    info!("[Games] Owner {} created game {}", owner, game.id);
    Ok(HttpResponse::Ok().json(game))
}

/// PUT /api/games/{id}
pub async fn update_game(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateGame>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_game_id(&path)?;
    let owner = user.id();
    let changes = body.into_inner().into_changes();
    let store = state.store.clone();
    let game = web::block(move || store.update(id, owner, changes))
        .await??
        .ok_or_else(|| ApiError::not_found(id))?;
    state.cache.invalidate(&owner).await;
    debug!("[Games] Owner {} updated game {}", owner, id);
    Ok(HttpResponse::Ok().json(game))
}

/// DELETE /api/games/{id}
pub async fn delete_game(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_game_id(&path)?;
    let owner = user.id();
    let store = state.store.clone();
    if !web::block(move || store.delete(id, owner)).await?? {
        return Err(ApiError::not_found(id));
    }
    state.cache.invalidate(&owner).await;
    info!("[Games] Owner {} removed game {}", owner, id);
    Ok(HttpResponse::Ok().json(json!({ "msg": "Game removed" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(body: Value) -> GameChanges {
        serde_json::from_value::<UpdateGame>(body).unwrap().into_changes()
    }

    #[test]
    fn create_requires_a_title() {
        for body in [json!({}), json!({"title": ""}), json!({"title": null})] {
            let req: CreateGame = serde_json::from_value(body).unwrap();
            assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
        }
    }

    #[test]
    fn create_fills_defaults() {
        let req: CreateGame = serde_json::from_value(json!({"title": "Chess Variant"})).unwrap();
        let game = req.validate().unwrap();
        assert_eq!(game.pieces, json!([]));
        assert_eq!(game.rules, "");
    }

    #[test]
    fn create_treats_falsy_pieces_as_empty() {
        for pieces in [json!(null), json!(false), json!(0), json!("")] {
            let req: CreateGame =
                serde_json::from_value(json!({"title": "Go", "pieces": pieces})).unwrap();
            assert_eq!(req.validate().unwrap().pieces, json!([]));
        }
    }

    #[test]
    fn blank_titles_are_still_titles() {
        let req: CreateGame = serde_json::from_value(json!({"title": "   "})).unwrap();
        assert_eq!(req.validate().unwrap().title, "   ");
    }

    #[test]
    fn update_drops_falsy_fields() {
        let changes = update(json!({"title": "", "rules": "", "pieces": null}));
        assert!(changes.title.is_none());
        assert!(changes.rules.is_none());
        assert!(changes.pieces.is_none());

        let changes = update(json!({"pieces": []}));
        assert_eq!(changes.pieces, Some(json!([])));
        assert!(changes.title.is_none());

        let changes = update(json!({"title": "New", "rules": "Roll twice."}));
        assert_eq!(changes.title.as_deref(), Some("New"));
        assert_eq!(changes.rules.as_deref(), Some("Roll twice."));
    }

    #[test]
    fn malformed_ids_are_not_found() {
        assert!(matches!(parse_game_id("not-a-uuid"), Err(ApiError::NotFound { .. })));
        assert!(parse_game_id("00000000-0000-0000-0000-000000000000").is_ok());
    }
}

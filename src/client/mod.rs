//! Persistence gateway.
//!
//! The editor talks to the game API through the [`GameGateway`] trait. Each
//! call is one request carrying the bearer token read from the local
//! [`TokenStore`]. Failures are returned as [`GatewayError`]; nothing is
//! retried.

pub mod catalog;
pub mod http;
pub mod token;

use async_trait::async_trait;

use crate::game::record::{GameDocument, GameDraft};
use crate::game::types::GameId;

pub use http::HttpGateway;
pub use token::TokenStore;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No token in the local store; the user is not logged in.
    #[error("no auth token stored")]
    MissingToken,

    #[error("failed to read auth token: {0}")]
    TokenStore(#[from] std::io::Error),

    /// The server rejected the token.
    #[error("unauthorized")]
    Unauthorized,

    /// Game missing or owned by someone else.
    #[error("game not found")]
    NotFound,

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Request/response access to the game store.
#[async_trait]
pub trait GameGateway: Send + Sync {
    /// All games owned by the caller.
    async fn list(&self) -> Result<Vec<GameDocument>, GatewayError>;

    async fn load(&self, id: GameId) -> Result<GameDocument, GatewayError>;

    /// Persist a new game; the server assigns its id.
    async fn create(&self, draft: &GameDraft) -> Result<GameDocument, GatewayError>;

    /// Overwrite title, pieces and rules of an existing game.
    async fn update(&self, id: GameId, draft: &GameDraft) -> Result<GameDocument, GatewayError>;

    async fn delete(&self, id: GameId) -> Result<(), GatewayError>;
}

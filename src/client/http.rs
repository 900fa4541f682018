//! HTTP implementation of the persistence gateway.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::client::{GameGateway, GatewayError, TokenStore};
use crate::game::record::{GameDocument, GameDraft};
use crate::game::types::GameId;

/// Talks to the `/api/games` endpoints of a boardcraft server.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    tokens: TokenStore,
}

impl HttpGateway {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> Self {
        Self::with_client(Client::new(), base_url, tokens)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, tokens: TokenStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url, tokens }
    }

    fn games_url(&self) -> String {
        format!("{}/api/games", self.base_url)
    }

    fn game_url(&self, id: GameId) -> String {
        format!("{}/api/games/{}", self.base_url, id)
    }

    /// Attach the stored bearer token.
    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, GatewayError> {
        let token = self.tokens.require()?;
        Ok(req.bearer_auth(token))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, GatewayError> {
        let resp = self.authorized(req)?.send().await?;
        let status = resp.status();
        debug!("[Gateway] {} {}", status, resp.url());
        match status {
            s if s.is_success() => Ok(resp),
            StatusCode::UNAUTHORIZED => Err(GatewayError::Unauthorized),
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
            s => {
                let body = resp.text().await.unwrap_or_default();
                warn!("[Gateway] Request failed with {}: {}", s, body);
                Err(GatewayError::Status { status: s.as_u16(), body })
            }
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, GatewayError> {
        let resp = self.send(req).await?;
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl GameGateway for HttpGateway {
    async fn list(&self) -> Result<Vec<GameDocument>, GatewayError> {
        self.send_json(self.client.get(self.games_url())).await
    }

    async fn load(&self, id: GameId) -> Result<GameDocument, GatewayError> {
        self.send_json(self.client.get(self.game_url(id))).await
    }

    async fn create(&self, draft: &GameDraft) -> Result<GameDocument, GatewayError> {
        self.send_json(self.client.post(self.games_url()).json(draft)).await
    }

    async fn update(&self, id: GameId, draft: &GameDraft) -> Result<GameDocument, GatewayError> {
        self.send_json(self.client.put(self.game_url(id)).json(draft)).await
    }

    async fn delete(&self, id: GameId) -> Result<(), GatewayError> {
        self.send(self.client.delete(self.game_url(id))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let gateway = HttpGateway::new("http://localhost:5000/", TokenStore::new("unused"));
        let id = uuid::Uuid::nil();
        assert_eq!(gateway.games_url(), "http://localhost:5000/api/games");
        assert_eq!(
            gateway.game_url(id),
            "http://localhost:5000/api/games/00000000-0000-0000-0000-000000000000"
        );
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        // Nothing listens on this port; the token check must fail first.
        let tokens = TokenStore::new(dir.path().join("token"));
        let gateway = HttpGateway::new("http://127.0.0.1:9", tokens);
        let err = gateway.list().await.unwrap_err();
        assert!(matches!(err, GatewayError::MissingToken));
    }
}

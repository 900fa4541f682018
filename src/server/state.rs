// src/server/state.rs

//! Application state for the backend server.
//!
//! Cloned into every worker and injected into handlers as `web::Data<AppState>`.

use crate::server::auth::JwtKeys;
use crate::server::cache::GameListCache;
use crate::store::GameStore;

#[derive(Clone)]
pub struct AppState {
    pub store: GameStore,
    pub cache: GameListCache,
    pub keys: JwtKeys,
}

impl AppState {
    pub fn new(store: GameStore, cache: GameListCache, keys: JwtKeys) -> Self {
        AppState { store, cache, keys }
    }
}

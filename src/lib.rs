//! boardcraft: board-game authoring.
//!
//! The library holds both halves of the tool:
//! - `game` and `editor`: the piece model and the editing session with debounced autosave
//! - `client`: the gateway the editor persists through
//! - `store` and `server`: the game API, its SQLite store and the per-owner list cache

pub mod config;
pub mod game;
pub mod editor;
pub mod client;
pub mod store;
pub mod server;

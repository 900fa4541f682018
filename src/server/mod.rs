// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the HTTP backend:
//! - Application state (store, list cache, token keys)
//! - Bearer token verification
//! - The `/api/games` handlers and their routing
//! - The JSON error type every handler returns

pub mod auth;
pub mod cache;
pub mod error;
pub mod games;
pub mod router;
pub mod state;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::game::piece::Piece;
use crate::game::types::{GameId, OwnerId};

/// A persisted game as returned by the API, with its pieces decoded.
///
/// The server stores pieces as written by any client, so they are decoded one
/// by one: a piece that cannot be read is skipped with a warning instead of
/// failing the whole game (and with it the whole list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDocument {
    pub id: GameId,
    pub title: String,
    #[serde(default, deserialize_with = "decode_pieces")]
    pub pieces: Vec<Piece>,
    #[serde(default)]
    pub rules: String,
    pub user_id: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The editable part of a game, sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDraft {
    pub title: String,
    pub pieces: Vec<Piece>,
    pub rules: String,
}

impl GameDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pieces: Vec::new(),
            rules: String::new(),
        }
    }
}

fn decode_pieces<'de, D>(deserializer: D) -> Result<Vec<Piece>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!("[Game] Ignoring pieces that are not a list: {}", other);
            return Ok(Vec::new());
        }
    };

    let mut pieces = Vec::with_capacity(items.len());
    for item in items {
        match Piece::from_json(item) {
            Ok(piece) => pieces.push(piece),
            Err(e) => warn!("[Game] Skipping unreadable piece: {}", e),
        }
    }
    Ok(pieces)
}

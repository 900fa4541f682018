use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a persisted game, assigned by the server.
pub type GameId = Uuid;

/// Identifier of the user account owning a game.
pub type OwnerId = Uuid;

/// Identifier of a piece, unique within its game.
pub type PieceId = String;

/// Canvas coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Placement tools offered by the editor, one per piece type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Tile,
    Token,
    Card,
    Dice,
    Text,
    Shape,
    Counter,
    Path,
}

impl Tool {
    pub const ALL: [Tool; 8] = [
        Tool::Tile,
        Tool::Token,
        Tool::Card,
        Tool::Dice,
        Tool::Text,
        Tool::Shape,
        Tool::Counter,
        Tool::Path,
    ];

    /// Wire name of the piece type produced by this tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Tile => "tile",
            Tool::Token => "token",
            Tool::Card => "card",
            Tool::Dice => "dice",
            Tool::Text => "text",
            Tool::Shape => "shape",
            Tool::Counter => "counter",
            Tool::Path => "path",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

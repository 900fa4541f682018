//! Game definition model.
//!
//! Pieces placed on the board, the grid they snap to, and the game document
//! exchanged between the editor and the API.

pub mod types;
pub mod grid;
pub mod piece;
pub mod record;

pub use types::{GameId, OwnerId, PieceId, Position, Tool};
pub use piece::{Piece, PieceKind, PiecePatch};
pub use record::{GameDocument, GameDraft};

/// Editor configuration constants.
/// 
/// This module defines the board grid, the autosave debounce window and the
/// default attributes given to freshly placed pieces.
pub const GRID_SIZE: f64 = 20.0; // Grid unit in canvas pixels.

/// Delay (in milliseconds) between the last edit and the autosave request.
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 2000;

/// Title given to a game that has not been named yet.
pub const DEFAULT_TITLE: &str = "Untitled Game";

/// Canvas position used by the toolbar "add" button.
pub const DEFAULT_DROP_X: f64 = 400.0;
pub const DEFAULT_DROP_Y: f64 = 300.0;

/// Tile dimensions.
pub const TILE_WIDTH: f64 = 40.0;
pub const TILE_HEIGHT: f64 = 40.0;

/// Card dimensions, label and font size.
pub const CARD_WIDTH: f64 = 100.0;
pub const CARD_HEIGHT: f64 = 150.0;
pub const CARD_TEXT: &str = "New Card";
pub const CARD_FONT_SIZE: f64 = 16.0;

pub const TOKEN_RADIUS: f64 = 20.0;

pub const DICE_RADIUS: f64 = 25.0;
pub const DICE_COLOR: &str = "#4A5568";
/// Number of faces on a die.
pub const DICE_FACES: u8 = 6;

pub const TEXT_CONTENT: &str = "Double click to edit";
pub const TEXT_COLOR: &str = "#000000";
pub const TEXT_FONT_SIZE: f64 = 24.0;

/// Shapes start as triangles.
pub const SHAPE_RADIUS: f64 = 30.0;
pub const SHAPE_SIDES: u8 = 3;
/// Side counts offered by the property panel (5 renders as a star).
pub const SHAPE_SIDE_CHOICES: [u8; 5] = [3, 4, 5, 6, 8];

pub const COUNTER_RADIUS: f64 = 25.0;
pub const COUNTER_COLOR: &str = "#3B82F6";

/// Offset of a new path's end point from its start point.
pub const PATH_SPAN: f64 = 100.0;
/// Points of a path added from the toolbar rather than dropped on the board.
pub const TOOLBAR_PATH_POINTS: [f64; 4] = [100.0, 100.0, 200.0, 200.0];

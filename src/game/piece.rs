//! Placeable board pieces.
//!
//! A [`Piece`] carries the attributes shared by every element on the board,
//! while [`PieceKind`] holds exactly the fields of its type. On the wire both
//! are flattened into one JSON object tagged by `type`:
//!
//! ```json
//! {"id":"p1","type":"dice","x":400,"y":300,"color":"#4A5568","zIndex":0,"radius":25,"value":4}
//! ```
//!
//! Records written by older clients may omit variant fields; those load with
//! the same defaults the renderer falls back to. Fields belonging to another
//! type are dropped. [`Piece::from_json`] goes further and repairs values a
//! looser client may have written (numbers as strings, fractional counters).

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::editor::*;
use crate::game::types::{PieceId, Position, Tool};

/// One placeable element on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub id: PieceId,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "fallback_color")]
    pub color: String,
    #[serde(default)]
    pub z_index: i64,
    #[serde(flatten)]
    pub kind: PieceKind,
}

/// Type-specific attributes of a piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PieceKind {
    Tile {
        #[serde(default = "tile_width")]
        width: f64,
        #[serde(default = "tile_height")]
        height: f64,
    },
    Token {
        #[serde(default = "token_radius")]
        radius: f64,
    },
    Card {
        #[serde(default = "card_width")]
        width: f64,
        #[serde(default = "card_height")]
        height: f64,
        #[serde(default)]
        text: String,
        #[serde(rename = "fontSize", default = "card_font_size")]
        font_size: f64,
    },
    Dice {
        #[serde(default = "dice_radius")]
        radius: f64,
        #[serde(default = "dice_value")]
        value: u8,
    },
    Text {
        #[serde(default)]
        text: String,
        #[serde(rename = "fontSize", default = "text_font_size")]
        font_size: f64,
    },
    Shape {
        #[serde(default = "shape_radius")]
        radius: f64,
        #[serde(default = "shape_sides")]
        sides: u8,
    },
    Counter {
        #[serde(default = "counter_radius")]
        radius: f64,
        #[serde(default)]
        value: i64,
    },
    Path {
        #[serde(default)]
        points: Vec<f64>,
    },
}

fn fallback_color() -> String {
    "#e5e7eb".to_string()
}

fn tile_width() -> f64 {
    TILE_WIDTH
}

fn tile_height() -> f64 {
    TILE_HEIGHT
}

fn token_radius() -> f64 {
    TOKEN_RADIUS
}

fn card_width() -> f64 {
    CARD_WIDTH
}

fn card_height() -> f64 {
    CARD_HEIGHT
}

fn card_font_size() -> f64 {
    CARD_FONT_SIZE
}

fn dice_radius() -> f64 {
    DICE_RADIUS
}

fn dice_value() -> u8 {
    1
}

fn text_font_size() -> f64 {
    TEXT_FONT_SIZE
}

fn shape_radius() -> f64 {
    SHAPE_RADIUS
}

fn shape_sides() -> u8 {
    SHAPE_SIDES
}

fn counter_radius() -> f64 {
    COUNTER_RADIUS
}

/// Random `#rrggbb` color.
pub fn random_color<R: Rng>(rng: &mut R) -> String {
    format!("#{:06x}", rng.random_range(0..=0xFF_FFFFu32))
}

/// Roll one die.
pub fn roll_die<R: Rng>(rng: &mut R) -> u8 {
    rng.random_range(1..=DICE_FACES)
}

impl PieceKind {
    /// Default attributes for a piece created with `tool` at `at`.
    pub fn for_tool<R: Rng>(tool: Tool, at: Position, rng: &mut R) -> Self {
        match tool {
            Tool::Tile => PieceKind::Tile {
                width: TILE_WIDTH,
                height: TILE_HEIGHT,
            },
            Tool::Token => PieceKind::Token {
                radius: TOKEN_RADIUS,
            },
            Tool::Card => PieceKind::Card {
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
                text: CARD_TEXT.to_string(),
                font_size: CARD_FONT_SIZE,
            },
            Tool::Dice => PieceKind::Dice {
                radius: DICE_RADIUS,
                value: roll_die(rng),
            },
            Tool::Text => PieceKind::Text {
                text: TEXT_CONTENT.to_string(),
                font_size: TEXT_FONT_SIZE,
            },
            Tool::Shape => PieceKind::Shape {
                radius: SHAPE_RADIUS,
                sides: SHAPE_SIDES,
            },
            Tool::Counter => PieceKind::Counter {
                radius: COUNTER_RADIUS,
                value: 0,
            },
            Tool::Path => PieceKind::Path {
                points: vec![at.x, at.y, at.x + PATH_SPAN, at.y + PATH_SPAN],
            },
        }
    }

    /// Tool (and wire `type`) of this piece.
    pub fn tool(&self) -> Tool {
        match self {
            PieceKind::Tile { .. } => Tool::Tile,
            PieceKind::Token { .. } => Tool::Token,
            PieceKind::Card { .. } => Tool::Card,
            PieceKind::Dice { .. } => Tool::Dice,
            PieceKind::Text { .. } => Tool::Text,
            PieceKind::Shape { .. } => Tool::Shape,
            PieceKind::Counter { .. } => Tool::Counter,
            PieceKind::Path { .. } => Tool::Path,
        }
    }
}

impl Piece {
    /// Build a piece for `tool` at an already snapped position.
    pub fn for_tool<R: Rng>(
        id: PieceId,
        tool: Tool,
        at: Position,
        z_index: i64,
        rng: &mut R,
    ) -> Self {
        let color = match tool {
            Tool::Dice => DICE_COLOR.to_string(),
            Tool::Text => TEXT_COLOR.to_string(),
            Tool::Counter => COUNTER_COLOR.to_string(),
            _ => random_color(rng),
        };
        Piece {
            id,
            x: at.x,
            y: at.y,
            color,
            z_index,
            kind: PieceKind::for_tool(tool, at, rng),
        }
    }

    /// Decode a stored piece, repairing what the strict model would reject.
    ///
    /// Numeric strings are parsed and integer fields are rounded. Nulls and
    /// unusable values fall back to their defaults, as do dice faces and side
    /// counts the editor cannot show. Only a missing id or an unknown `type`
    /// is still an error.
    pub fn from_json(value: Value) -> Result<Piece, serde_json::Error> {
        serde_json::from_value(repair(value))
    }

    pub fn tool(&self) -> Tool {
        self.kind.tool()
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Merge `patch` into this piece. Attributes that do not exist on this
    /// piece's type are ignored. Returns true if anything changed.
    pub fn apply(&mut self, patch: &PiecePatch) -> bool {
        let before = self.clone();

        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(z) = patch.z_index {
            self.z_index = z;
        }

        match &mut self.kind {
            PieceKind::Tile { width, height } => {
                if let Some(w) = patch.width {
                    *width = w;
                }
                if let Some(h) = patch.height {
                    *height = h;
                }
            }
            PieceKind::Token { radius } => {
                if let Some(r) = patch.radius {
                    *radius = r;
                }
            }
            PieceKind::Card { width, height, text, font_size } => {
                if let Some(w) = patch.width {
                    *width = w;
                }
                if let Some(h) = patch.height {
                    *height = h;
                }
                if let Some(t) = &patch.text {
                    *text = t.clone();
                }
                if let Some(f) = patch.font_size {
                    *font_size = f;
                }
            }
            PieceKind::Dice { radius, value } => {
                if let Some(r) = patch.radius {
                    *radius = r;
                }
                // A die only shows faces it has.
                if let Some(v) = patch.value {
                    if (1..=i64::from(DICE_FACES)).contains(&v) {
                        *value = v as u8;
                    }
                }
            }
            PieceKind::Text { text, font_size } => {
                if let Some(t) = &patch.text {
                    *text = t.clone();
                }
                if let Some(f) = patch.font_size {
                    *font_size = f;
                }
            }
            PieceKind::Shape { radius, sides } => {
                if let Some(r) = patch.radius {
                    *radius = r;
                }
                // Only side counts the property panel offers.
                if let Some(s) = patch.sides {
                    if SHAPE_SIDE_CHOICES.contains(&s) {
                        *sides = s;
                    }
                }
            }
            PieceKind::Counter { radius, value } => {
                if let Some(r) = patch.radius {
                    *radius = r;
                }
                if let Some(v) = patch.value {
                    *value = v;
                }
            }
            PieceKind::Path { points } => {
                if let Some(p) = &patch.points {
                    *points = p.clone();
                }
            }
        }

        *self != before
    }
}

fn repair(value: Value) -> Value {
    let Value::Object(mut fields) = value else {
        return value;
    };
    fields.retain(|_, v| !v.is_null());

    coerce(&mut fields, "id", |v| match v {
        Value::String(_) => Some(v.clone()),
        Value::Number(n) => Some(Value::from(n.to_string())),
        _ => None,
    });
    for key in ["x", "y", "width", "height", "radius", "fontSize"] {
        coerce(&mut fields, key, |v| number(v).map(Value::from));
    }
    coerce(&mut fields, "zIndex", |v| integer(v).map(Value::from));
    for key in ["color", "text"] {
        coerce(&mut fields, key, |v| v.as_str().map(Value::from));
    }
    coerce(&mut fields, "points", |v| {
        v.as_array()
            .map(|points| points.iter().filter_map(number).map(Value::from).collect())
    });

    let dice = fields.get("type").and_then(Value::as_str) == Some("dice");
    coerce(&mut fields, "value", |v| {
        let n = integer(v)?;
        if dice && !(1..=i64::from(DICE_FACES)).contains(&n) {
            return None;
        }
        Some(Value::from(n))
    });
    coerce(&mut fields, "sides", |v| {
        let n = u8::try_from(integer(v)?).ok()?;
        SHAPE_SIDE_CHOICES.contains(&n).then(|| Value::from(n))
    });

    Value::Object(fields)
}

/// Replace `key` with `fix` of its value, or drop it when `fix` gives nothing.
fn coerce(fields: &mut Map<String, Value>, key: &str, fix: impl Fn(&Value) -> Option<Value>) {
    if let Some(raw) = fields.remove(key) {
        if let Some(fixed) = fix(&raw) {
            fields.insert(key.to_string(), fixed);
        }
    }
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn integer(value: &Value) -> Option<i64> {
    number(value).map(|n| n.round() as i64)
}

/// Partial piece attributes, as sent by the property panel or a drag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PiecePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
}

impl PiecePatch {
    pub fn position(pos: Position) -> Self {
        Self {
            x: Some(pos.x),
            y: Some(pos.y),
            ..Self::default()
        }
    }

    pub fn z_index(z: i64) -> Self {
        Self {
            z_index: Some(z),
            ..Self::default()
        }
    }

    pub fn value(value: i64) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn sides(sides: u8) -> Self {
        Self {
            sides: Some(sides),
            ..Self::default()
        }
    }
}

//! Board grid.
//!
//! Every position written by a drag or a placement lands on a multiple of
//! [`GRID_SIZE`].

use crate::config::editor::GRID_SIZE;
use crate::game::types::Position;

/// Round a coordinate to the nearest grid line. Halfway values round up.
pub fn snap_to_grid(value: f64) -> f64 {
    let snapped = (value / GRID_SIZE + 0.5).floor() * GRID_SIZE;
    // Avoid handing out -0.0.
    if snapped == 0.0 { 0.0 } else { snapped }
}

pub fn snap_position(pos: Position) -> Position {
    Position {
        x: snap_to_grid(pos.x),
        y: snap_to_grid(pos.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_to_nearest_multiple() {
        assert_eq!(snap_to_grid(0.0), 0.0);
        assert_eq!(snap_to_grid(9.0), 0.0);
        assert_eq!(snap_to_grid(10.0), 20.0);
        assert_eq!(snap_to_grid(29.9), 20.0);
        assert_eq!(snap_to_grid(407.0), 400.0);
        assert_eq!(snap_to_grid(-11.0), -20.0);
        assert_eq!(snap_to_grid(-10.0), 0.0);
    }

    #[test]
    fn snapping_is_idempotent() {
        for raw in [-137.5, -20.0, -3.0, 0.0, 12.0, 19.99, 250.0, 401.0, 1234.5] {
            let once = snap_to_grid(raw);
            assert_eq!(snap_to_grid(once), once, "raw value {}", raw);
            assert_eq!(once % GRID_SIZE, 0.0);
        }
    }

    #[test]
    fn snaps_both_axes() {
        let pos = snap_position(Position::new(33.0, 71.0));
        assert_eq!(pos, Position::new(40.0, 80.0));
    }
}

//! Parking lot domain entity

use chrono::{DateTime, Utc};

/// A parking lot: a collection of spots arranged on a rows × columns grid.
#[derive(Debug, Clone)]
pub struct ParkingLot {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub grid_rows: i32,
    pub grid_cols: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a lot; the id is generated by the store.
#[derive(Debug, Clone)]
pub struct NewParkingLot {
    pub name: String,
    pub location: Option<String>,
    pub grid_rows: i32,
    pub grid_cols: i32,
}

impl ParkingLot {
    /// Whether a grid position lies inside this lot's grid.
    pub fn contains_position(&self, row: i32, col: i32) -> bool {
        (0..self.grid_rows).contains(&row) && (0..self.grid_cols).contains(&col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lot() -> ParkingLot {
        ParkingLot {
            id: 1,
            name: "Main Lot".into(),
            location: Some("North Campus".into()),
            grid_rows: 4,
            grid_cols: 6,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn position_inside_grid() {
        let lot = sample_lot();
        assert!(lot.contains_position(0, 0));
        assert!(lot.contains_position(3, 5));
    }

    #[test]
    fn position_outside_grid() {
        let lot = sample_lot();
        assert!(!lot.contains_position(4, 0));
        assert!(!lot.contains_position(0, 6));
        assert!(!lot.contains_position(-1, 0));
    }
}

//! Parking spot domain entity

use chrono::{DateTime, Utc};

/// Administrative spot status.
///
/// Set manually by an administrator; independent of the booking ledger and
/// never derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotStatus {
    Available,
    Occupied,
    Reserved,
    UnderMaintenance,
}

impl SpotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Occupied => "OCCUPIED",
            Self::Reserved => "RESERVED",
            Self::UnderMaintenance => "UNDER_MAINTENANCE",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "OCCUPIED" => Self::Occupied,
            "RESERVED" => Self::Reserved,
            "UNDER_MAINTENANCE" => Self::UnderMaintenance,
            _ => Self::Available,
        }
    }
}

impl std::fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compass orientation of the spot on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "N",
            Self::East => "E",
            Self::South => "S",
            Self::West => "W",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "E" => Self::East,
            "S" => Self::South,
            "W" => Self::West,
            _ => Self::North,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single parking space, uniquely positioned on a grid within a lot.
#[derive(Debug, Clone)]
pub struct ParkingSpot {
    pub id: i32,
    pub spot_number: String,
    pub parking_lot_id: i32,
    pub grid_row: i32,
    pub grid_col: i32,
    pub orientation: Orientation,
    pub status: SpotStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParkingSpot {
    /// A spot accepts new bookings unless an administrator has taken it out
    /// of service.
    pub fn is_bookable(&self) -> bool {
        self.status != SpotStatus::UnderMaintenance
    }
}

/// Fields for creating a spot; the id is generated by the store.
#[derive(Debug, Clone)]
pub struct NewParkingSpot {
    pub spot_number: String,
    pub parking_lot_id: i32,
    pub grid_row: i32,
    pub grid_col: i32,
    pub orientation: Orientation,
    pub status: SpotStatus,
}

/// Admin edits applied to an existing spot
#[derive(Debug, Clone)]
pub struct SpotUpdate {
    pub spot_number: String,
    pub grid_row: i32,
    pub grid_col: i32,
    pub orientation: Orientation,
    pub status: SpotStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spot(status: SpotStatus) -> ParkingSpot {
        ParkingSpot {
            id: 1,
            spot_number: "A-01".into(),
            parking_lot_id: 1,
            grid_row: 0,
            grid_col: 0,
            orientation: Orientation::North,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn maintenance_spot_is_not_bookable() {
        assert!(!sample_spot(SpotStatus::UnderMaintenance).is_bookable());
    }

    #[test]
    fn non_maintenance_statuses_are_bookable() {
        // RESERVED and OCCUPIED are administrative display states, not booking gates
        assert!(sample_spot(SpotStatus::Available).is_bookable());
        assert!(sample_spot(SpotStatus::Occupied).is_bookable());
        assert!(sample_spot(SpotStatus::Reserved).is_bookable());
    }

    #[test]
    fn status_round_trip() {
        for status in &[
            SpotStatus::Available,
            SpotStatus::Occupied,
            SpotStatus::Reserved,
            SpotStatus::UnderMaintenance,
        ] {
            assert_eq!(&SpotStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_defaults_to_available() {
        assert_eq!(SpotStatus::from_str("???"), SpotStatus::Available);
    }

    #[test]
    fn orientation_round_trip() {
        for o in &[
            Orientation::North,
            Orientation::East,
            Orientation::South,
            Orientation::West,
        ] {
            assert_eq!(&Orientation::from_str(o.as_str()), o);
        }
    }
}

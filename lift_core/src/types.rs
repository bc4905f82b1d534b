//! Car state shared by the scheduler and the motion/door sequences.

pub use lift_traits::FloorIndex;

/// Travel direction of the car. Exactly one variant is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Idle,
    Up,
    Down,
}

impl Direction {
    /// Direction needed to get from `from` to `to`; `Idle` when they match.
    pub fn toward(from: FloorIndex, to: FloorIndex) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => Direction::Idle,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Idle => "idle",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position and door status of the car.
///
/// While `door_open` is true, `current_floor` and `direction` do not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorState {
    pub current_floor: FloorIndex,
    pub direction: Direction,
    pub door_open: bool,
}

impl ElevatorState {
    pub fn at(floor: FloorIndex) -> Self {
        Self {
            current_floor: floor,
            direction: Direction::Idle,
            door_open: false,
        }
    }
}

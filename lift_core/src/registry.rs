//! Pending floor calls.

use crate::types::FloorIndex;

/// One "call pending" flag per floor, indexed 1..=N.
///
/// Flags are set by debounced registration and cleared only when the floor is
/// serviced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRegistry {
    pending: Vec<bool>,
}

impl CallRegistry {
    pub fn new(floors: u8) -> Self {
        Self {
            pending: vec![false; usize::from(floors)],
        }
    }

    pub fn floors(&self) -> u8 {
        // Constructed from a u8 count.
        self.pending.len() as u8
    }

    fn slot(floor: FloorIndex) -> Option<usize> {
        usize::from(floor).checked_sub(1)
    }

    /// Mark `floor` as called. Returns true only if it was not pending before.
    /// Unknown floors are ignored.
    pub fn register(&mut self, floor: FloorIndex) -> bool {
        match Self::slot(floor).and_then(|i| self.pending.get_mut(i)) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            Some(_) => false,
            None => {
                tracing::warn!(floor, "ignoring call for unknown floor");
                false
            }
        }
    }

    pub fn clear(&mut self, floor: FloorIndex) {
        if let Some(flag) = Self::slot(floor).and_then(|i| self.pending.get_mut(i)) {
            *flag = false;
        }
    }

    pub fn clear_all(&mut self) {
        self.pending.fill(false);
    }

    pub fn is_pending(&self, floor: FloorIndex) -> bool {
        Self::slot(floor)
            .and_then(|i| self.pending.get(i))
            .copied()
            .unwrap_or(false)
    }

    pub fn has_any(&self) -> bool {
        self.pending.iter().any(|&p| p)
    }

    /// Any call in the half-open floor range `[lo, hi)`.
    pub fn has_in_range(&self, lo: FloorIndex, hi: FloorIndex) -> bool {
        (lo..hi).any(|f| self.is_pending(f))
    }

    pub fn has_above(&self, floor: FloorIndex) -> bool {
        self.first_above(floor).is_some()
    }

    pub fn has_below(&self, floor: FloorIndex) -> bool {
        self.has_in_range(1, floor)
    }

    /// Nearest call strictly above `floor`.
    pub fn first_above(&self, floor: FloorIndex) -> Option<FloorIndex> {
        let start = floor.checked_add(1)?;
        (start..=self.floors()).find(|&f| self.is_pending(f))
    }

    /// Nearest call strictly below `floor`.
    pub fn first_below(&self, floor: FloorIndex) -> Option<FloorIndex> {
        (1..floor).rev().find(|&f| self.is_pending(f))
    }

    /// Floors with a pending call, ascending.
    pub fn snapshot(&self) -> Vec<FloorIndex> {
        (1..=self.floors()).filter(|&f| self.is_pending(f)).collect()
    }
}

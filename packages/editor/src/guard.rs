use pagesmith_model::{ElementType, Position};
use std::time::{Duration, Instant};

/// Drops rapid-fire duplicate adds at the dispatch boundary.
///
/// A drop gesture can fire its add twice in quick succession. An add with
/// the same element type and position as the previous one, arriving inside
/// the window, is rejected.
#[derive(Debug)]
pub struct AddGuard {
    window: Duration,
    last: Option<(ElementType, Position, Instant)>,
}

impl AddGuard {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Returns false when the add should be ignored
    pub fn admit(&mut self, element_type: ElementType, position: Position, now: Instant) -> bool {
        if self.window.is_zero() {
            return true;
        }

        if let Some((last_type, last_position, at)) = self.last {
            let duplicate = last_type == element_type && last_position == position;
            if duplicate && now.saturating_duration_since(at) < self.window {
                return false;
            }
        }

        self.last = Some((element_type, position, now));
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

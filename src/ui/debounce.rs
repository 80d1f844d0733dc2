//! Edge debouncing for one button.
//!
//! A falling edge opens a window unless one is already open. Edges inside
//! the window are contact bounce and keep the original timestamp. When the
//! window has passed the caller samples the pin; a press is reported only
//! if the button is still held.

#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u32,
    first_edge: Option<u32>,
}

impl Debouncer {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            first_edge: None,
        }
    }

    /// Record an edge seen at `now`.
    pub fn edge(&mut self, now: u32) {
        match self.first_edge {
            Some(first) if now.wrapping_sub(first) <= self.window_ms => {}
            _ => self.first_edge = Some(now),
        }
    }

    /// Sample taken after the window. Returns the press timestamp.
    pub fn confirm(&self, held: bool) -> Option<u32> {
        if held {
            self.first_edge
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounce_keeps_first_timestamp() {
        let mut debouncer = Debouncer::new(30);
        debouncer.edge(1_000);
        debouncer.edge(1_004);
        debouncer.edge(1_029);
        assert_eq!(debouncer.confirm(true), Some(1_000));
    }

    #[test]
    fn edge_after_window_starts_new_press() {
        let mut debouncer = Debouncer::new(30);
        debouncer.edge(1_000);
        debouncer.edge(1_031);
        assert_eq!(debouncer.confirm(true), Some(1_031));
    }

    #[test]
    fn released_during_window_is_not_a_press() {
        let mut debouncer = Debouncer::new(30);
        assert_eq!(debouncer.confirm(true), None);
        debouncer.edge(50);
        assert_eq!(debouncer.confirm(false), None);
    }

    #[test]
    fn window_across_clock_wrap() {
        let mut debouncer = Debouncer::new(30);
        debouncer.edge(u32::MAX - 5);
        debouncer.edge(10);
        assert_eq!(debouncer.confirm(true), Some(u32::MAX - 5));
    }
}

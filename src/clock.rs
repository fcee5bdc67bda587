//! Simulated resource clocks
//!
//! Time in the model is a plain integer. A clock does not tick on its own:
//! it records the earliest time at which a resource may next be used.
//! Callers supply the current time to every operation and the operation
//! checks the relevant clock before doing anything.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Simulated time, in abstract milliseconds.
pub type Time = i64;

/// The two resources whose busy-ness gates the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Clocks {
    /// Time at which attention becomes free.
    attention: Time,

    /// Time at which learning becomes free.
    learning: Time,
}

impl Clocks {
    /// Create clocks that are free from `time` onwards.
    pub fn new(time: Time) -> Self {
        Self {
            attention: time,
            learning: time,
        }
    }

    #[inline]
    pub fn attention(&self) -> Time {
        self.attention
    }

    #[inline]
    pub fn learning(&self) -> Time {
        self.learning
    }

    /// Latest of the two clocks.
    #[inline]
    pub fn max(&self) -> Time {
        self.attention.max(self.learning)
    }

    /// Is attention free at `time`?
    #[inline]
    pub fn attention_free_at(&self, time: Time) -> bool {
        time >= self.attention
    }

    /// Is learning free at `time`?
    #[inline]
    pub fn learning_free_at(&self, time: Time) -> bool {
        time >= self.learning
    }

    /// Mark attention busy until `time`. Never moves the clock backwards.
    pub fn consume_attention(&mut self, time: Time) {
        self.attention = self.attention.max(time);
    }

    /// Mark learning busy until `time`. Never moves the clock backwards.
    pub fn consume_learning(&mut self, time: Time) {
        self.learning = self.learning.max(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clocks_free() {
        let clocks = Clocks::new(50);
        assert!(clocks.attention_free_at(50));
        assert!(clocks.learning_free_at(50));
        assert!(!clocks.learning_free_at(49));
        assert_eq!(clocks.max(), 50);
    }

    #[test]
    fn test_clocks_monotone() {
        let mut clocks = Clocks::default();
        clocks.consume_learning(200);
        clocks.consume_learning(100);
        assert_eq!(clocks.learning(), 200);

        clocks.consume_attention(300);
        assert_eq!(clocks.max(), 300);
        assert_eq!(clocks.attention(), 300);
    }
}

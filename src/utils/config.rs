//! Tunable values.
//!
//! Tunables are kept as constants of type [`DefMinMax`] next to the code
//! using them. A value handed in by a user is clamped into the allowed
//! range via [`DefMinMax::limit`].

use std::cmp;

//------------ DefMinMax -----------------------------------------------------

/// The default, minimum, and maximum values for a config variable.
#[derive(Clone, Copy, Debug)]
pub struct DefMinMax<T> {
    /// The default value,
    def: T,

    /// The minimum value,
    min: T,

    /// The maximum value,
    max: T,
}

impl<T> DefMinMax<T> {
    /// Creates a new value.
    pub const fn new(def: T, min: T, max: T) -> Self {
        Self { def, min, max }
    }

    /// Returns the default value.
    pub fn default(self) -> T {
        self.def
    }

    /// Returns the smallest allowed value.
    pub fn min(self) -> T {
        self.min
    }

    /// Returns the largest allowed value.
    pub fn max(self) -> T {
        self.max
    }

    /// Trims the given value to fit into the minimum/maximum range.
    pub fn limit(self, value: T) -> T
    where
        T: Ord,
    {
        cmp::max(self.min, cmp::min(self.max, value))
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn limit() {
        const PAYLOAD: DefMinMax<u16> = DefMinMax::new(1232, 512, 4096);
        assert_eq!(PAYLOAD.default(), 1232);
        assert_eq!(PAYLOAD.limit(100), 512);
        assert_eq!(PAYLOAD.limit(1400), 1400);
        assert_eq!(PAYLOAD.limit(65535), 4096);
    }
}

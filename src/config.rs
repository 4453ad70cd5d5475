//! Sizing policy for `ChainedHashMap`.

use crate::error::Error;

/// Number of buckets a fresh (or reset) map starts with.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Ratio of entries to buckets above which the table doubles.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Largest bucket array a map will allocate. Past this point the table
/// stops doubling and chains grow longer instead.
pub const MAX_BUCKETS: usize = 1 << 28;

/// Smallest accepted load factor.
pub const MIN_LOAD_FACTOR: f64 = 0.01;

/// Initial bucket count and load-factor threshold for a map.
///
/// `remove_all` returns the map to `initial_capacity`, not to whatever
/// capacity it had grown to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    initial_capacity: usize,
    load_factor: f64,
}

impl MapConfig {
    pub const fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Rejects settings under which the table could never hold an entry or
    /// would need more than `MAX_BUCKETS` buckets to honour the load factor.
    pub fn validate(&self) -> Result<(), Error> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidArgument("initial capacity must be non-zero"));
        }
        if self.initial_capacity > MAX_BUCKETS {
            return Err(Error::InvalidArgument(
                "initial capacity exceeds the maximum bucket count",
            ));
        }
        if !self.load_factor.is_finite() || self.load_factor < MIN_LOAD_FACTOR {
            return Err(Error::InvalidArgument(
                "load factor must be finite and at least 0.01",
            ));
        }
        Ok(())
    }

    /// True if holding `len` entries in `capacity` buckets breaks the threshold.
    pub(crate) fn exceeded_by(&self, len: usize, capacity: usize) -> bool {
        len as f64 / capacity as f64 > self.load_factor
    }

    /// Smallest doubling of `capacity` that keeps `len` entries within the
    /// threshold, capped at `MAX_BUCKETS`.
    pub(crate) fn grown_capacity(&self, len: usize, capacity: usize) -> usize {
        let mut next = capacity.clamp(1, MAX_BUCKETS);
        while next < MAX_BUCKETS && self.exceeded_by(len, next) {
            next = (next * 2).min(MAX_BUCKETS);
        }
        next
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! Capacity Module
//!
//! Normalized entry-count limit for the cache.

use serde::{Deserialize, Serialize};

// == Capacity ==
/// Maximum number of live entries, where zero means unbounded.
///
/// Any value that is not a finite positive number normalizes to zero.
/// Fractional limits are kept as given and compared literally against
/// the entry count, so a capacity of `2.5` holds at most two entries.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Capacity(f64);

impl Capacity {
    /// No limit on the number of entries.
    pub const UNBOUNDED: Capacity = Capacity(0.0);

    // == Constructor ==
    /// Creates a capacity, normalizing non-finite or non-positive values to zero.
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self::UNBOUNDED
        }
    }

    /// Returns the raw limit (0.0 = unbounded).
    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_unbounded(self) -> bool {
        self.0 == 0.0
    }

    // == Is Exceeded By ==
    /// Returns true if holding `count` entries breaks this limit.
    pub fn is_exceeded_by(self, count: usize) -> bool {
        !self.is_unbounded() && count as f64 > self.0
    }
}

impl From<f64> for Capacity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<f32> for Capacity {
    fn from(value: f32) -> Self {
        Self::new(f64::from(value))
    }
}

impl From<Capacity> for f64 {
    fn from(capacity: Capacity) -> Self {
        capacity.0
    }
}

macro_rules! capacity_from_int {
    ($($int:ty),*) => {
        $(
            impl From<$int> for Capacity {
                fn from(value: $int) -> Self {
                    Self::new(value as f64)
                }
            }
        )*
    };
}

capacity_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Text is never a number, so any string is unbounded.
impl From<&str> for Capacity {
    fn from(_: &str) -> Self {
        Self::UNBOUNDED
    }
}

impl From<String> for Capacity {
    fn from(_: String) -> Self {
        Self::UNBOUNDED
    }
}

impl<T: Into<Capacity>> From<Option<T>> for Capacity {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::UNBOUNDED)
    }
}

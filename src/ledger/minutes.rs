use std::{fmt::Display, iter::Sum, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only failure the ledger knows about. Callers are expected to record zero instead and move
/// on, data entry is never blocked by a single bad field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid usage value {input:?}, expected a whole non-negative number of minutes")]
pub struct InvalidUsageValue {
    pub input: String,
}

/// Amount of usage in whole minutes. Can't be negative.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Minutes(u32);

impl Minutes {
    pub const ZERO: Minutes = Minutes(0);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn saturating_add(self, other: Minutes) -> Minutes {
        Minutes(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Minutes) -> Minutes {
        Minutes(self.0.saturating_sub(other.0))
    }

    pub fn saturating_mul(self, factor: u32) -> Minutes {
        Minutes(self.0.saturating_mul(factor))
    }
}

impl Display for Minutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} min", self.0)
    }
}

impl FromStr for Minutes {
    type Err = InvalidUsageValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Minutes)
            .map_err(|_| InvalidUsageValue { input: s.into() })
    }
}

impl Deref for Minutes {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Sum for Minutes {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Minutes::ZERO, Minutes::saturating_add)
    }
}

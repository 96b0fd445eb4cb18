//! Weighted closed integer ranges.
//!
//! A `WeightedRange` is the value everything else is built from: a closed
//! interval `[left, right]` over non-negative integers, tagged with a signed
//! weight. Bounds are validated at construction and the value is immutable
//! afterwards; anything that reshapes a range produces new values through the
//! same validating constructor.

use std::fmt;

use thiserror::Error;

/// Bounds rejected by [`WeightedRange::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvalidRange {
    #[error("invalid range: left ({left}) is larger than right ({right})")]
    LeftAfterRight { left: i64, right: i64 },
    #[error("invalid range: left ({0}) is less than 0")]
    NegativeLeft(i64),
    #[error("invalid range: right ({0}) is less than 0")]
    NegativeRight(i64),
}

/// Where one range sits relative to another on the number line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// Entirely left of the other range, no shared point.
    Before,
    /// Entirely right of the other range, no shared point.
    After,
    /// The closed intervals share at least one integer point.
    Overlapping,
}

/// A closed integer interval `[left, right]` with an attached weight.
///
/// Invariant, checked at construction: `0 <= left <= right`. The weight is an
/// unconstrained signed integer; stacking ranges adds weights together, so a
/// negative weight acts as a decrement over the points it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightedRange {
    left: i64,
    right: i64,
    weight: i64,
}

impl WeightedRange {
    /// Validate bounds and construct a range.
    pub fn new(left: i64, right: i64, weight: i64) -> Result<WeightedRange, InvalidRange> {
        if left > right {
            return Err(InvalidRange::LeftAfterRight { left, right });
        }
        if left < 0 {
            return Err(InvalidRange::NegativeLeft(left));
        }
        if right < 0 {
            return Err(InvalidRange::NegativeRight(right));
        }
        Ok(WeightedRange { left, right, weight })
    }

    #[inline]
    pub fn left(&self) -> i64 {
        self.left
    }

    #[inline]
    pub fn right(&self) -> i64 {
        self.right
    }

    #[inline]
    pub fn weight(&self) -> i64 {
        self.weight
    }

    /// Whether the point `p` falls inside the closed interval.
    #[inline]
    pub fn contains(&self, p: i64) -> bool {
        self.left <= p && p <= self.right
    }

    /// Classify where `self` sits relative to `other`.
    ///
    /// Exactly one of the three cases holds; `Overlapping` covers everything
    /// from a single shared endpoint up to full containment.
    pub fn position(&self, other: &WeightedRange) -> Position {
        if self.right < other.left {
            Position::Before
        } else if other.right < self.left {
            Position::After
        } else {
            Position::Overlapping
        }
    }
}

/// Validate a batch of `(left, right, weight)` triples.
///
/// Stops at the first invalid triple and returns its error.
pub fn make_ranges(triples: &[(i64, i64, i64)]) -> Result<Vec<WeightedRange>, InvalidRange> {
    triples
        .iter()
        .map(|&(left, right, weight)| WeightedRange::new(left, right, weight))
        .collect()
}

impl fmt::Display for WeightedRange {
    /// Diagnostic form `weight:|left_right|`, e.g. `3:|1_5|`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:|{}_{}|", self.weight, self.left, self.right)
    }
}

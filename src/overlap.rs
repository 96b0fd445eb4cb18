//! Overlap classification and range splitting.
//!
//! When an incoming range lands on a stored one, the pair is canonicalized
//! into (primary, secondary): smaller left bound first, ties broken by the
//! larger right bound. The shape of their intersection decides how the
//! stored range is cut apart and how the weights redistribute. The part of
//! the incoming range that extends past the stored one is handed back as a
//! carryover for the caller to merge into the next stored range.
//!
//! The five shapes, primary on top:
//!
//! ```text
//! Equal        LeftInside   Inside       RightInside  RightOutside
//! -------      -------      -------      -------      -------
//! -------      ----            ---          ----          -------
//! ```

use smallvec::SmallVec;
use thiserror::Error;

use crate::range::{InvalidRange, WeightedRange};

/// How two overlapping ranges relate once canonically ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapShape {
    /// Same left and same right bound.
    Equal,
    /// Same left bound; the secondary ends before the primary.
    LeftInside,
    /// The secondary sits strictly inside the primary.
    Inside,
    /// Same right bound; the secondary starts after the primary.
    RightInside,
    /// The secondary starts inside the primary but runs past its right edge.
    RightOutside,
}

/// Splitting failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SplitError {
    /// The pair fits none of the five shapes. Unreachable for inputs that
    /// were pre-checked with [`WeightedRange::position`]; hitting it means
    /// the caller skipped that check or the storage ordering is broken.
    #[error("failed to combine ranges: unknown overlap")]
    UnknownOverlap,
    /// An intermediate piece failed bounds validation.
    #[error(transparent)]
    InvalidRange(#[from] InvalidRange),
}

/// Result of splitting a stored range against an incoming one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    /// 1-3 disjoint pieces replacing the stored range, in ascending order.
    pub replacements: SmallVec<[WeightedRange; 3]>,
    /// Unresolved tail of the incoming range, past the stored one's right
    /// edge. Still carries only the incoming weight.
    pub carryover: Option<WeightedRange>,
}

/// An overlapping pair in canonical order.
struct Canonical {
    primary: WeightedRange,
    secondary: WeightedRange,
    /// Whether the incoming range's right bound extends past the stored
    /// one's. This flag, not the primary/secondary designation, decides
    /// which piece becomes the carryover.
    incoming_extends: bool,
}

fn canonicalize(stored: WeightedRange, incoming: WeightedRange) -> Canonical {
    let incoming_first = incoming.left() < stored.left()
        || (incoming.left() == stored.left() && incoming.right() > stored.right());

    let (primary, secondary) = if incoming_first {
        (incoming, stored)
    } else {
        (stored, incoming)
    };

    Canonical {
        primary,
        secondary,
        incoming_extends: incoming.right() > stored.right(),
    }
}

/// Classify a canonically ordered pair, or `None` when no shape fits.
fn classify(primary: &WeightedRange, secondary: &WeightedRange) -> Option<OverlapShape> {
    // The pair must actually intersect; canonical order puts the primary
    // first, so a gap shows up as the secondary starting past its right edge.
    if primary.right() < secondary.left() {
        return None;
    }

    if primary.right() == secondary.right() {
        if primary.left() == secondary.left() {
            return Some(OverlapShape::Equal);
        }
        if primary.left() < secondary.left() {
            return Some(OverlapShape::RightInside);
        }
        return None;
    }

    if primary.left() == secondary.left() {
        if secondary.right() < primary.right() {
            return Some(OverlapShape::LeftInside);
        }
        return None;
    }

    if primary.left() < secondary.left() && secondary.right() < primary.right() {
        return Some(OverlapShape::Inside);
    }

    if secondary.left() > primary.left() && secondary.right() > primary.right() {
        return Some(OverlapShape::RightOutside);
    }

    None
}

/// Canonicalize two ranges and classify the shape of their overlap.
///
/// `None` when the ranges do not intersect. Symmetric: the shape does not
/// depend on argument order.
pub fn shape_of(a: WeightedRange, b: WeightedRange) -> Option<OverlapShape> {
    let canon = canonicalize(a, b);
    classify(&canon.primary, &canon.secondary)
}

/// Split `stored` against `incoming`, redistributing weights.
///
/// Both ranges must overlap. The overlapped region always ends up weighted
/// with the sum of both weights; regions covered by only one of the two keep
/// that range's weight alone. When the incoming range extends past the
/// stored one, its tail comes back as `carryover` instead of a committed
/// piece.
pub fn split(stored: WeightedRange, incoming: WeightedRange) -> Result<Split, SplitError> {
    let canon = canonicalize(stored, incoming);
    let p = canon.primary;
    let s = canon.secondary;
    let shape = classify(&p, &s).ok_or(SplitError::UnknownOverlap)?;

    let mut replacements: SmallVec<[WeightedRange; 3]> = SmallVec::new();
    let mut carryover = None;

    match shape {
        OverlapShape::Equal => {
            replacements.push(WeightedRange::new(
                p.left(),
                p.right(),
                p.weight() + s.weight(),
            )?);
        }

        OverlapShape::LeftInside => {
            let shared = WeightedRange::new(p.left(), s.right(), p.weight() + s.weight())?;
            let tail = WeightedRange::new(s.right() + 1, p.right(), p.weight())?;
            replacements.push(shared);
            if canon.incoming_extends {
                carryover = Some(tail);
            } else {
                replacements.push(tail);
            }
        }

        OverlapShape::Inside => {
            let head = WeightedRange::new(p.left(), s.left() - 1, p.weight())?;
            let shared = WeightedRange::new(s.left(), s.right(), p.weight() + s.weight())?;
            let tail = WeightedRange::new(s.right() + 1, p.right(), p.weight())?;
            replacements.push(head);
            replacements.push(shared);
            if canon.incoming_extends {
                carryover = Some(tail);
            } else {
                replacements.push(tail);
            }
        }

        OverlapShape::RightInside => {
            let head = WeightedRange::new(p.left(), s.left() - 1, p.weight())?;
            let shared = WeightedRange::new(s.left(), s.right(), p.weight() + s.weight())?;
            replacements.push(head);
            replacements.push(shared);
        }

        OverlapShape::RightOutside => {
            let head = WeightedRange::new(p.left(), s.left() - 1, p.weight())?;
            let shared = WeightedRange::new(s.left(), p.right(), p.weight() + s.weight())?;
            let tail = WeightedRange::new(p.right() + 1, s.right(), s.weight())?;
            replacements.push(head);
            replacements.push(shared);
            if canon.incoming_extends {
                carryover = Some(tail);
            } else {
                replacements.push(tail);
            }
        }
    }

    Ok(Split { replacements, carryover })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(left: i64, right: i64, weight: i64) -> WeightedRange {
        WeightedRange::new(left, right, weight).unwrap()
    }

    /// Replacements plus carryover, flattened for symmetry comparisons.
    fn all_pieces(split: &Split) -> Vec<WeightedRange> {
        let mut pieces: Vec<_> = split.replacements.iter().copied().collect();
        pieces.extend(split.carryover);
        pieces
    }

    #[test]
    fn shape_classification() {
        assert_eq!(shape_of(range(1, 5, 1), range(1, 5, 2)), Some(OverlapShape::Equal));
        assert_eq!(shape_of(range(1, 7, 1), range(1, 3, 1)), Some(OverlapShape::LeftInside));
        assert_eq!(shape_of(range(1, 10, 1), range(3, 6, 1)), Some(OverlapShape::Inside));
        assert_eq!(shape_of(range(1, 7, 1), range(4, 7, 1)), Some(OverlapShape::RightInside));
        assert_eq!(shape_of(range(1, 5, 1), range(3, 8, 1)), Some(OverlapShape::RightOutside));
        assert_eq!(shape_of(range(1, 2, 1), range(4, 6, 1)), None);
    }

    #[test]
    fn shape_ignores_argument_order() {
        let cases = [
            (range(1, 5, 1), range(1, 5, 2)),
            (range(1, 7, 1), range(1, 3, 1)),
            (range(1, 10, 1), range(3, 6, 1)),
            (range(1, 7, 1), range(4, 7, 1)),
            (range(1, 5, 1), range(3, 8, 1)),
            (range(1, 2, 1), range(4, 6, 1)),
        ];

        for (a, b) in cases {
            assert_eq!(shape_of(a, b), shape_of(b, a), "asymmetric for {a} / {b}");
        }
    }

    #[test]
    fn equal_sums_weights() {
        let result = split(range(1, 5, 1), range(1, 5, 2)).unwrap();
        assert_eq!(result.replacements.as_slice(), &[range(1, 5, 3)]);
        assert_eq!(result.carryover, None);
    }

    #[test]
    fn left_inside_stored_is_shorter() {
        // incoming extends past the stored range: tail carries over
        let result = split(range(1, 3, 1), range(1, 7, 2)).unwrap();
        assert_eq!(result.replacements.as_slice(), &[range(1, 3, 3)]);
        assert_eq!(result.carryover, Some(range(4, 7, 2)));
    }

    #[test]
    fn left_inside_incoming_is_shorter() {
        // incoming ends first: both pieces commit in place
        let result = split(range(1, 7, 1), range(1, 3, 2)).unwrap();
        assert_eq!(
            result.replacements.as_slice(),
            &[range(1, 3, 3), range(4, 7, 1)]
        );
        assert_eq!(result.carryover, None);
    }

    #[test]
    fn inside_incoming_contained() {
        let result = split(range(1, 10, 1), range(3, 6, 2)).unwrap();
        assert_eq!(
            result.replacements.as_slice(),
            &[range(1, 2, 1), range(3, 6, 3), range(7, 10, 1)]
        );
        assert_eq!(result.carryover, None);
    }

    #[test]
    fn inside_stored_contained() {
        // stored strictly inside incoming: head and shared commit, the
        // incoming tail carries over with its own weight
        let result = split(range(3, 6, 1), range(1, 10, 2)).unwrap();
        assert_eq!(
            result.replacements.as_slice(),
            &[range(1, 2, 2), range(3, 6, 3)]
        );
        assert_eq!(result.carryover, Some(range(7, 10, 2)));
    }

    #[test]
    fn right_inside_shared_right_edge() {
        let result = split(range(1, 7, 1), range(4, 7, 2)).unwrap();
        assert_eq!(
            result.replacements.as_slice(),
            &[range(1, 3, 1), range(4, 7, 3)]
        );
        assert_eq!(result.carryover, None);
    }

    #[test]
    fn right_inside_incoming_on_the_left() {
        // shared right edge with the incoming range as primary
        let result = split(range(4, 7, 1), range(1, 7, 2)).unwrap();
        assert_eq!(
            result.replacements.as_slice(),
            &[range(1, 3, 2), range(4, 7, 3)]
        );
        assert_eq!(result.carryover, None);
    }

    #[test]
    fn right_outside_incoming_extends() {
        let result = split(range(1, 5, 1), range(3, 8, 2)).unwrap();
        assert_eq!(
            result.replacements.as_slice(),
            &[range(1, 2, 1), range(3, 5, 3)]
        );
        assert_eq!(result.carryover, Some(range(6, 8, 2)));
    }

    #[test]
    fn right_outside_stored_extends() {
        // stored runs past the incoming range: everything commits in place
        let result = split(range(3, 8, 1), range(1, 5, 2)).unwrap();
        assert_eq!(
            result.replacements.as_slice(),
            &[range(1, 2, 2), range(3, 5, 3), range(6, 8, 1)]
        );
        assert_eq!(result.carryover, None);
    }

    #[test]
    fn single_shared_point() {
        let result = split(range(1, 5, 1), range(5, 9, 2)).unwrap();
        assert_eq!(
            result.replacements.as_slice(),
            &[range(1, 4, 1), range(5, 5, 3)]
        );
        assert_eq!(result.carryover, Some(range(6, 9, 2)));
    }

    #[test]
    fn disjoint_pair_is_unknown() {
        assert_eq!(
            split(range(1, 2, 1), range(5, 8, 1)),
            Err(SplitError::UnknownOverlap)
        );
        assert_eq!(
            split(range(5, 8, 1), range(1, 2, 1)),
            Err(SplitError::UnknownOverlap)
        );
    }

    #[test]
    fn symmetric_piece_sets() {
        // The produced pieces do not depend on which range was stored; only
        // the carryover slot does.
        let cases = [
            (range(1, 5, 1), range(1, 5, 2)),
            (range(1, 3, 1), range(1, 7, 2)),
            (range(1, 10, 1), range(3, 6, 2)),
            (range(1, 7, 1), range(4, 7, 2)),
            (range(1, 5, 1), range(3, 8, 2)),
            (range(1, 5, 1), range(5, 9, 2)),
        ];

        for (a, b) in cases {
            let forward = split(a, b).unwrap();
            let backward = split(b, a).unwrap();
            assert_eq!(
                all_pieces(&forward),
                all_pieces(&backward),
                "pieces diverged for {a} / {b}"
            );
        }
    }

    #[test]
    fn replacements_are_disjoint_and_ordered() {
        let cases = [
            (range(1, 10, 1), range(3, 6, 2)),
            (range(1, 5, 1), range(3, 8, 2)),
            (range(1, 7, 1), range(1, 3, 2)),
        ];

        for (stored, incoming) in cases {
            let result = split(stored, incoming).unwrap();
            for pair in result.replacements.windows(2) {
                assert!(
                    pair[0].right() < pair[1].left(),
                    "pieces out of order for {stored} / {incoming}"
                );
            }
        }
    }

    #[test]
    fn negative_weights_redistribute() {
        let result = split(range(1, 5, 3), range(2, 4, -1)).unwrap();
        assert_eq!(
            result.replacements.as_slice(),
            &[range(1, 1, 3), range(2, 4, 2), range(5, 5, 3)]
        );
    }
}

//! Disjoint weighted range sets with merge-on-insert.
//!
//! A [`RangeSet`] keeps its members sorted and pairwise disjoint while
//! stacking weights: wherever an inserted range lands on stored ones, the
//! stored ranges are cut apart so the covered points record the sum of every
//! weight ever dropped on them. The set itself is a thin orchestrator; the
//! member sequence lives behind the [`Storage`] trait so the scan-and-splice
//! backend can be swapped without touching the insertion logic.

use std::fmt;

use log::trace;
use thiserror::Error;

use crate::overlap::{self, SplitError};
use crate::range::WeightedRange;

mod linked_list;

pub use linked_list::LinkedList;

/// Stable handle to a member of a storage backend.
///
/// Identity, not value: two members can hold equal ranges and still be
/// different handles, and a handle stays pinned to its member across
/// replacements that overwrite the range in place. Handles are only
/// meaningful for the storage that issued them; a handle whose member has
/// been deleted stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemberId {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

/// The handle does not name a live member of this storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("member is not owned by this set")]
pub struct NotAMember;

/// Insertion failure surfaced by [`RangeSet::add`].
///
/// Either error class indicates caller misuse or an upstream invariant
/// breach; when one escapes mid-walk the storage may be partially updated
/// and should be discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SetError {
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    NotAMember(#[from] NotAMember),
}

/// The capability set a member sequence has to provide.
///
/// Implementations hold disjoint members in ascending left-bound order. The
/// default backend is [`LinkedList`]; anything with the same contract (an
/// interval tree, say) can stand in.
pub trait Storage {
    /// Scan for members overlapping `new`. When there are none, commit `new`
    /// as a brand-new member at its sorted position and return an empty
    /// list; when there are some, return their handles in encounter order
    /// and mutate nothing.
    fn add_or_find_overlapping(&mut self, new: WeightedRange) -> Vec<MemberId>;

    /// Handles of all members overlapping `range`, in order. Read-only.
    fn find_overlapping(&self, range: WeightedRange) -> Vec<MemberId>;

    /// Swap the member behind `target` for zero or more replacement ranges.
    ///
    /// Zero replacements delete the member. One overwrites its range in
    /// place, preserving the handle. More than one overwrites the member
    /// with the first range and splices the rest in immediately after it.
    fn replace(&mut self, target: MemberId, replacements: &[WeightedRange])
    -> Result<(), NotAMember>;

    /// The range behind a live handle.
    fn get(&self, id: MemberId) -> Option<WeightedRange>;

    /// Walk members front to back until the visitor returns true or the
    /// sequence ends. Every step re-checks the ordering invariant between
    /// the previous member and the current one; a regression panics, since a
    /// sequence that lost its ordering cannot answer anything truthfully.
    fn for_each(&self, visitor: &mut dyn FnMut(MemberId, &WeightedRange) -> bool);
}

/// A sorted, disjoint, weight-stacking set of ranges.
pub struct RangeSet<S = LinkedList> {
    storage: S,
}

impl RangeSet<LinkedList> {
    pub fn new() -> RangeSet<LinkedList> {
        RangeSet { storage: LinkedList::new() }
    }
}

impl Default for RangeSet<LinkedList> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> RangeSet<S> {
    /// Build a set over a caller-supplied backend.
    pub fn with_storage(storage: S) -> RangeSet<S> {
        RangeSet { storage }
    }

    /// Insert `range`, merging it into whatever it overlaps.
    ///
    /// Disjoint inserts commit directly. Otherwise the overlap run is
    /// consumed member by member: each member is split against the incoming
    /// range, the pieces replace it in place, and the incoming tail past the
    /// member's right edge carries over to the next. A tail that outlives
    /// the run starts past everything it was matched against, so one more
    /// round commits it as a direct insert.
    pub fn add(&mut self, range: WeightedRange) -> Result<(), SetError> {
        trace!("add {range}");
        let mut incoming = range;

        loop {
            let overlapping = self.storage.add_or_find_overlapping(incoming);
            if overlapping.is_empty() {
                trace!("committed {incoming} without overlap");
                return Ok(());
            }

            trace!("{incoming} overlaps {} members", overlapping.len());
            for id in overlapping {
                let stored = self.storage.get(id).ok_or(NotAMember)?;
                let split = overlap::split(stored, incoming)?;
                trace!(
                    "split {stored} against {incoming}: {} pieces, carryover {:?}",
                    split.replacements.len(),
                    split.carryover.map(|c| c.to_string()),
                );
                self.storage.replace(id, &split.replacements)?;
                match split.carryover {
                    Some(tail) => incoming = tail,
                    None => return Ok(()),
                }
            }

            trace!("carryover {incoming} outlived the overlap run");
        }
    }

    /// Handles of all members overlapping `range`, in order.
    pub fn find_overlapping(&self, range: WeightedRange) -> Vec<MemberId> {
        self.storage.find_overlapping(range)
    }

    /// Swap a member for zero or more replacement ranges. See
    /// [`Storage::replace`].
    pub fn replace(
        &mut self,
        target: MemberId,
        replacements: &[WeightedRange],
    ) -> Result<(), NotAMember> {
        self.storage.replace(target, replacements)
    }

    /// The range behind a live handle.
    pub fn get(&self, id: MemberId) -> Option<WeightedRange> {
        self.storage.get(id)
    }

    /// The n-th member in iteration order, zero-based.
    pub fn nth(&self, n: usize) -> Option<MemberId> {
        let mut remaining = n;
        let mut found = None;
        self.storage.for_each(&mut |id, _| {
            if remaining == 0 {
                found = Some(id);
                return true;
            }
            remaining -= 1;
            false
        });
        found
    }

    /// The greatest weight held by any member; 0 for an empty set.
    pub fn max(&self) -> i64 {
        let mut max: Option<i64> = None;
        self.storage.for_each(&mut |_, range| {
            max = Some(match max {
                Some(seen) => seen.max(range.weight()),
                None => range.weight(),
            });
            false
        });
        max.unwrap_or(0)
    }

    /// Walk members front to back until `visitor` returns true.
    pub fn for_each(&self, mut visitor: impl FnMut(MemberId, &WeightedRange) -> bool) {
        self.storage.for_each(&mut visitor);
    }

    /// The stored ranges in order. Diagnostics and tests.
    pub fn ranges(&self) -> Vec<WeightedRange> {
        let mut out = Vec::new();
        self.storage.for_each(&mut |_, range| {
            out.push(*range);
            false
        });
        out
    }
}

impl<S: Storage> fmt::Display for RangeSet<S> {
    /// One member per line in their `weight:|left_right|` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = Ok(());
        self.storage.for_each(&mut |_, range| {
            result = writeln!(f, "{range}");
            result.is_err()
        });
        result
    }
}

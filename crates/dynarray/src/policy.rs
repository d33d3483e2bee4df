//! Capacity growth and shrink policy.
//!
//! Growth is geometric (`2c + 1`) with a single minimal fallback (`c + 1`)
//! when the preferred size cannot be obtained. Shrinking halves the
//! capacity once fewer than half the slots are live, which bounds slack to
//! roughly twice the live data.

/// Capacities to attempt, in order, when a full container must grow.
///
/// Candidates whose computation overflows are omitted. The preferred size
/// and the fallback coincide only when `current == 0`, which live
/// containers never reach.
pub fn growth_candidates(current: usize) -> impl Iterator<Item = usize> {
    let preferred = current.checked_mul(2).and_then(|c| c.checked_add(1));
    let fallback = current.checked_add(1);
    preferred
        .into_iter()
        .chain(fallback.filter(move |&f| Some(f) != preferred))
}

/// Capacity to shrink to after a removal, if any.
///
/// Returns `Some(capacity / 2)` when `len < capacity / 2`. The target is
/// never zero: a non-zero `capacity / 2` is required for `len` to be
/// strictly below it.
pub fn shrink_target(len: usize, capacity: usize) -> Option<usize> {
    let half = capacity / 2;
    (len < half).then_some(half)
}

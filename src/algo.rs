//! The adaptive natural merge sort engine.
//!
//! This module implements a Timsort-style stable sort over a key column plus
//! satellite columns moved in lockstep:
//! - **Run scanning**: maximal ascending runs are detected as-is; strictly
//!   descending runs are reversed in place.
//! - **Binary insertion sort**: short runs are extended to a computed minimum
//!   length before entering the merge machinery.
//! - **Merge collapse policy**: pending runs live on a stack kept balanced so
//!   merge costs stay `O(n log n)`.
//! - **Galloping merges**: when one run wins repeatedly, the merge switches
//!   from element-at-a-time copying to exponential search and bulk moves.
//!
//! The main entry points are [`tandemsort`], [`tandemsort_by`],
//! [`tandemsort_with`], and [`tandemsort_with_by`].

use crate::core::{Run, Satellite, SortStats};
use crate::error::SortError;
use cuneiform::cuneiform;
use std::cmp::Ordering;

/// Inputs shorter than this are sorted by binary insertion sort alone.
const MIN_MERGE: usize = 32;

/// Consecutive wins one run needs before a merge enters galloping mode.
const MIN_GALLOP: usize = 7;

/// Initial scratch allocation for merges, in elements.
const INITIAL_TMP_STORAGE_LENGTH: usize = 256;

/// Sorts `keys[lo..hi]` ascending, in place.
///
/// The sort is stable: keys that compare equal keep their input order. Runtime
/// is `O(n log n)` worst case and `O(n)` for already-sorted or reverse-sorted
/// input.
///
/// # Arguments
///
/// * `keys` - The column to sort.
/// * `lo`, `hi` - The half-open range to sort; must satisfy
///   `lo <= hi <= keys.len()`.
///
/// # Returns
///
/// [`SortStats`] describing the runs detected and merges performed.
///
/// # Examples
///
/// ```
/// use tandemsort::tandemsort;
///
/// let mut keys = vec![5, 3, 3, 1, 4];
/// tandemsort(&mut keys, 0, 5).unwrap();
///
/// assert_eq!(keys, vec![1, 3, 3, 4, 5]);
/// ```
#[inline]
pub fn tandemsort<K>(keys: &mut [K], lo: usize, hi: usize) -> Result<SortStats, SortError>
where
    K: Ord + Clone,
{
    tandemsort_with(keys, &mut (), lo, hi)
}

/// Sorts `keys[lo..hi]` with a comparator function.
///
/// The comparator must be a strict weak ordering; if it contradicts itself the
/// sort fails with [`SortError::ComparatorContract`] rather than corrupting
/// the columns.
///
/// ```
/// use tandemsort::tandemsort_by;
///
/// let mut keys = vec![1, 4, 2, 5, 3];
/// tandemsort_by(&mut keys, 0, 5, |a, b| b.cmp(a)).unwrap();
///
/// assert_eq!(keys, vec![5, 4, 3, 2, 1]);
/// ```
#[inline]
pub fn tandemsort_by<K, F>(
    keys: &mut [K],
    lo: usize,
    hi: usize,
    compare: F,
) -> Result<SortStats, SortError>
where
    K: Clone,
    F: FnMut(&K, &K) -> Ordering,
{
    tandemsort_with_by(keys, &mut (), lo, hi, compare)
}

/// Sorts `keys[lo..hi]` ascending while permuting satellite columns in
/// lockstep.
///
/// Each key's payload follows it to its final position, and the sort is
/// stable, so rows with equal keys keep their input order.
///
/// # Arguments
///
/// * `keys` - The column ordering the rows.
/// * `data` - Satellite columns; every column must have the same length as
///   `keys`.
/// * `lo`, `hi` - The half-open range to sort.
///
/// # Examples
///
/// ```
/// use tandemsort::tandemsort_with;
///
/// let mut keys = vec![5, 3, 3, 1, 4];
/// let mut tags = vec!["a", "b", "c", "d", "e"];
///
/// tandemsort_with(&mut keys, &mut tags, 0, 5).unwrap();
///
/// assert_eq!(keys, vec![1, 3, 3, 4, 5]);
/// assert_eq!(tags, vec!["d", "b", "c", "e", "a"]);
/// ```
#[inline]
pub fn tandemsort_with<K, S>(
    keys: &mut [K],
    data: &mut S,
    lo: usize,
    hi: usize,
) -> Result<SortStats, SortError>
where
    K: Ord + Clone,
    S: Satellite + ?Sized,
{
    sort_impl(keys, data, lo, hi, K::lt)
}

/// Sorts `keys[lo..hi]` with a comparator function while permuting satellite
/// columns in lockstep.
#[inline]
pub fn tandemsort_with_by<K, S, F>(
    keys: &mut [K],
    data: &mut S,
    lo: usize,
    hi: usize,
    mut compare: F,
) -> Result<SortStats, SortError>
where
    K: Clone,
    S: Satellite + ?Sized,
    F: FnMut(&K, &K) -> Ordering,
{
    sort_impl(keys, data, lo, hi, move |a, b| {
        compare(a, b) == Ordering::Less
    })
}

fn sort_impl<K, S, F>(
    keys: &mut [K],
    data: &mut S,
    lo: usize,
    hi: usize,
    is_less: F,
) -> Result<SortStats, SortError>
where
    K: Clone,
    S: Satellite + ?Sized,
    F: FnMut(&K, &K) -> bool,
{
    if lo > hi || hi > keys.len() {
        return Err(SortError::InvalidRange {
            lo,
            hi,
            len: keys.len(),
        });
    }
    if let Some(found) = data.length_mismatch(keys.len()) {
        return Err(SortError::SatelliteLength {
            expected: keys.len(),
            found,
        });
    }

    let mut sorter = Sorter::new(keys, data, is_less);
    sorter.sort(lo, hi)?;
    Ok(sorter.stats())
}

/// Computes the minimum run length for an input of length `n`.
///
/// Returns `n` itself for short inputs. Otherwise halves `n` until it drops
/// below 64, adding one if any shifted-out bit was set; the result lands in
/// `32..=64` and keeps `n / minrun` at or just under a power of two so the
/// final merges stay balanced.
fn min_run_length(mut n: usize) -> usize {
    let mut r = 0;
    while n >= MIN_MERGE * 2 {
        r |= n & 1;
        n >>= 1;
    }
    n + r
}

// Adaptive state read on every comparison of the linear merge loop, kept on
// its own cache line.
#[cuneiform]
struct MergeState {
    min_gallop: usize,
    stats: SortStats,
}

/// One sort invocation: the columns being sorted, the run stack, and the
/// reusable merge scratch. Everything lives exactly as long as the call.
struct Sorter<'a, K, S: Satellite + ?Sized, F> {
    keys: &'a mut [K],
    data: &'a mut S,
    is_less: F,
    /// Pending runs, bottom to top. Adjacent entries are contiguous.
    runs: Vec<Run>,
    /// Scratch copy of the smaller run of the pair being merged.
    tmp: Vec<K>,
    tmp_data: S::Scratch,
    /// Elements the scratch buffers are good for.
    tmp_length: usize,
    state: MergeState,
}

impl<'a, K, S, F> Sorter<'a, K, S, F>
where
    K: Clone,
    S: Satellite + ?Sized,
    F: FnMut(&K, &K) -> bool,
{
    fn new(keys: &'a mut [K], data: &'a mut S, is_less: F) -> Self {
        let tmp_data = data.scratch();
        Sorter {
            keys,
            data,
            is_less,
            runs: Vec::new(),
            tmp: Vec::new(),
            tmp_data,
            tmp_length: 0,
            state: MergeState {
                min_gallop: MIN_GALLOP,
                stats: SortStats::default(),
            },
        }
    }

    fn stats(&self) -> SortStats {
        self.state.stats
    }

    fn sort(&mut self, mut lo: usize, hi: usize) -> Result<(), SortError> {
        let mut remaining = hi - lo;
        if remaining < 2 {
            return Ok(());
        }
        if remaining < MIN_MERGE {
            let run_len = self.count_run_and_make_ascending(lo, hi);
            self.binary_sort(lo, hi, lo + run_len);
            return Ok(());
        }

        self.reserve_storage()?;
        let min_run = min_run_length(remaining);
        loop {
            let mut run_len = self.count_run_and_make_ascending(lo, hi);
            if run_len < min_run {
                let forced = remaining.min(min_run);
                self.binary_sort(lo, lo + forced, lo + run_len);
                run_len = forced;
            }
            self.push_run(lo, run_len);
            self.merge_collapse()?;
            lo += run_len;
            remaining -= run_len;
            if remaining == 0 {
                break;
            }
        }
        debug_assert_eq!(lo, hi);
        self.merge_force_collapse()?;
        debug_assert_eq!(self.runs.len(), 1);
        Ok(())
    }

    /// Sizes the run stack and the initial scratch from the column length.
    fn reserve_storage(&mut self) -> Result<(), SortError> {
        let n = self.keys.len();
        let tmp_length = if n < 2 * INITIAL_TMP_STORAGE_LENGTH {
            n >> 1
        } else {
            INITIAL_TMP_STORAGE_LENGTH
        };
        self.tmp.try_reserve_exact(tmp_length)?;
        self.data.reserve_scratch(&mut self.tmp_data, tmp_length)?;
        self.tmp_length = tmp_length;

        // Deep enough that the collapse invariant can never overflow it.
        let stack_cap = if n < 120 {
            5
        } else if n < 1542 {
            10
        } else if n < 119_151 {
            19
        } else {
            40
        };
        self.runs.try_reserve_exact(stack_cap)?;
        Ok(())
    }

    /// Returns the length of the maximal run starting at `lo`, reversing it
    /// first if it is strictly descending.
    ///
    /// Only strictly descending runs are reversed; a run of equal keys counts
    /// as ascending, which is what keeps the reversal stable.
    fn count_run_and_make_ascending(&mut self, lo: usize, hi: usize) -> usize {
        debug_assert!(lo < hi);
        let Sorter {
            keys,
            data,
            is_less,
            state,
            ..
        } = self;
        state.stats.runs += 1;

        let mut run_hi = lo + 1;
        if run_hi == hi {
            return 1;
        }
        if is_less(&keys[run_hi], &keys[lo]) {
            run_hi += 1;
            while run_hi < hi && is_less(&keys[run_hi], &keys[run_hi - 1]) {
                run_hi += 1;
            }
            keys[lo..run_hi].reverse();
            data.reverse(lo, run_hi);
            state.stats.reversed_runs += 1;
        } else {
            run_hi += 1;
            while run_hi < hi && !is_less(&keys[run_hi], &keys[run_hi - 1]) {
                run_hi += 1;
            }
        }
        run_hi - lo
    }

    /// Extends the sorted prefix `[lo, start)` through `hi` by binary-search
    /// insertion. Stable: equal keys are inserted after their peers.
    fn binary_sort(&mut self, lo: usize, hi: usize, mut start: usize) {
        debug_assert!(lo <= start && start <= hi);
        let Sorter {
            keys,
            data,
            is_less,
            ..
        } = self;

        if start == lo {
            start += 1;
        }
        while start < hi {
            let mut left = lo;
            let mut right = start;
            while left < right {
                let mid = left + ((right - left) >> 1);
                if is_less(&keys[start], &keys[mid]) {
                    right = mid;
                } else {
                    left = mid + 1;
                }
            }
            debug_assert_eq!(left, right);
            keys[left..=start].rotate_right(1);
            data.rotate_right(left, start + 1);
            start += 1;
        }
    }

    fn push_run(&mut self, base: usize, len: usize) {
        self.runs.push(Run { base, len });
    }

    /// Restores the stack invariant by merging until, for the topmost runs,
    /// each run is longer than the sum of the two above it and each run is
    /// longer than the one above it. Prefers merging the smaller neighbor
    /// when there is a choice.
    fn merge_collapse(&mut self) -> Result<(), SortError> {
        while self.runs.len() > 1 {
            let n = self.runs.len() - 2;
            if (n >= 1 && self.runs[n - 1].len <= self.runs[n].len + self.runs[n + 1].len)
                || (n >= 2 && self.runs[n - 2].len <= self.runs[n].len + self.runs[n - 1].len)
            {
                let at = if self.runs[n - 1].len < self.runs[n + 1].len {
                    n - 1
                } else {
                    n
                };
                self.merge_at(at)?;
            } else if self.runs[n].len > self.runs[n + 1].len {
                break;
            } else {
                self.merge_at(n)?;
            }
        }
        Ok(())
    }

    /// Merges everything down to a single run once the input is exhausted.
    fn merge_force_collapse(&mut self) -> Result<(), SortError> {
        while self.runs.len() > 1 {
            let mut n = self.runs.len() - 2;
            if n > 0 && self.runs[n - 1].len < self.runs[n + 1].len {
                n -= 1;
            }
            self.merge_at(n)?;
        }
        Ok(())
    }

    /// Merges stack runs `i` and `i + 1`, which must be adjacent in the stack
    /// and contiguous in the columns.
    fn merge_at(&mut self, i: usize) -> Result<(), SortError> {
        debug_assert!(self.runs.len() >= 2);
        debug_assert!(i == self.runs.len() - 2 || i == self.runs.len() - 3);

        let Run {
            base: base1,
            len: len1,
        } = self.runs[i];
        let Run {
            base: base2,
            len: len2,
        } = self.runs[i + 1];
        debug_assert!(len1 > 0 && len2 > 0);
        debug_assert_eq!(base1 + len1, base2);

        // Record the merged run now; the trimmed elements below are already
        // in their final positions and still belong to it.
        self.runs[i].len = len1 + len2;
        self.runs.remove(i + 1);

        // Skip the prefix of run 1 already below all of run 2.
        let shift = gallop_right(
            &self.keys[base2],
            &*self.keys,
            base1,
            len1,
            0,
            &mut self.is_less,
        );
        let base1 = base1 + shift;
        let len1 = len1 - shift;
        if len1 == 0 {
            return Ok(());
        }

        // Skip the suffix of run 2 already above all of run 1.
        let len2 = gallop_left(
            &self.keys[base1 + len1 - 1],
            &*self.keys,
            base2,
            len2,
            len2 - 1,
            &mut self.is_less,
        );
        if len2 == 0 {
            return Ok(());
        }

        self.state.stats.merges += 1;
        // Stash the smaller run; this bounds scratch storage to n / 2.
        if len1 <= len2 {
            self.ensure_capacity(len1)?;
            self.merge_lo(base1, len1, base2, len2)
        } else {
            self.ensure_capacity(len2)?;
            self.merge_hi(base1, len1, base2, len2)
        }
    }

    /// Grows the scratch buffers to hold at least `min_capacity` elements,
    /// rounding up to a power of two capped at half the column length.
    fn ensure_capacity(&mut self, min_capacity: usize) -> Result<(), SortError> {
        if self.tmp_length < min_capacity {
            let new_len = match min_capacity.checked_next_power_of_two() {
                Some(p) => p.min(self.keys.len() >> 1),
                None => min_capacity,
            };
            self.tmp.clear();
            self.tmp.try_reserve_exact(new_len)?;
            self.data.reserve_scratch(&mut self.tmp_data, new_len)?;
            self.tmp_length = new_len;
        }
        Ok(())
    }

    /// Merges two contiguous runs front to back, with run 1 (the smaller)
    /// stashed in scratch. Caller guarantees the first element of run 2 is
    /// below all of run 1 and the last element of run 1 is above all of
    /// run 2.
    fn merge_lo(
        &mut self,
        base1: usize,
        mut len1: usize,
        base2: usize,
        mut len2: usize,
    ) -> Result<(), SortError> {
        debug_assert!(len1 > 0 && len2 > 0 && base1 + len1 == base2);
        let Sorter {
            keys,
            data,
            is_less,
            tmp,
            tmp_data,
            state,
            ..
        } = self;

        tmp.clear();
        tmp.extend_from_slice(&keys[base1..base1 + len1]);
        data.stash(base1, len1, tmp_data);

        let mut cursor1 = 0;
        let mut cursor2 = base2;
        let mut dest = base1;

        // First element of run 2 is the minimum of the merged range.
        keys[dest] = keys[cursor2].clone();
        data.copy(cursor2, dest);
        cursor2 += 1;
        dest += 1;
        len2 -= 1;
        if len2 == 0 {
            keys[dest..dest + len1].clone_from_slice(&tmp[cursor1..cursor1 + len1]);
            data.unstash_range(tmp_data, cursor1, dest, len1);
            return Ok(());
        }
        if len1 == 1 {
            copy_range(&mut **keys, cursor2, dest, len2);
            data.copy_range(cursor2, dest, len2);
            keys[dest + len2] = tmp[cursor1].clone();
            data.unstash(tmp_data, cursor1, dest + len2);
            return Ok(());
        }

        let mut min_gallop = state.min_gallop;
        'outer: loop {
            let mut count1 = 0;
            let mut count2 = 0;

            // Element-at-a-time mode, counting consecutive wins per side.
            loop {
                debug_assert!(len1 > 1 && len2 > 0);
                if is_less(&keys[cursor2], &tmp[cursor1]) {
                    keys[dest] = keys[cursor2].clone();
                    data.copy(cursor2, dest);
                    cursor2 += 1;
                    dest += 1;
                    count2 += 1;
                    count1 = 0;
                    len2 -= 1;
                    if len2 == 0 {
                        break 'outer;
                    }
                } else {
                    keys[dest] = tmp[cursor1].clone();
                    data.unstash(tmp_data, cursor1, dest);
                    cursor1 += 1;
                    dest += 1;
                    count1 += 1;
                    count2 = 0;
                    len1 -= 1;
                    if len1 == 1 {
                        break 'outer;
                    }
                }
                if (count1 | count2) >= min_gallop {
                    break;
                }
            }

            // One run is winning consistently; jump whole stretches of it.
            state.stats.gallops += 1;
            loop {
                debug_assert!(len1 > 1 && len2 > 0);
                count1 = gallop_right(&keys[cursor2], &**tmp, cursor1, len1, 0, is_less);
                if count1 != 0 {
                    keys[dest..dest + count1].clone_from_slice(&tmp[cursor1..cursor1 + count1]);
                    data.unstash_range(tmp_data, cursor1, dest, count1);
                    dest += count1;
                    cursor1 += count1;
                    len1 -= count1;
                    if len1 <= 1 {
                        break 'outer;
                    }
                }
                keys[dest] = keys[cursor2].clone();
                data.copy(cursor2, dest);
                cursor2 += 1;
                dest += 1;
                len2 -= 1;
                if len2 == 0 {
                    break 'outer;
                }

                count2 = gallop_left(&tmp[cursor1], &**keys, cursor2, len2, 0, is_less);
                if count2 != 0 {
                    copy_range(&mut **keys, cursor2, dest, count2);
                    data.copy_range(cursor2, dest, count2);
                    dest += count2;
                    cursor2 += count2;
                    len2 -= count2;
                    if len2 == 0 {
                        break 'outer;
                    }
                }
                keys[dest] = tmp[cursor1].clone();
                data.unstash(tmp_data, cursor1, dest);
                cursor1 += 1;
                dest += 1;
                len1 -= 1;
                if len1 == 1 {
                    break 'outer;
                }
                min_gallop = min_gallop.saturating_sub(1);
                if !(count1 >= MIN_GALLOP || count2 >= MIN_GALLOP) {
                    break;
                }
            }
            // Galloping stopped paying off; make it harder to re-enter.
            min_gallop += 2;
        }
        state.min_gallop = min_gallop.max(1);

        if len1 == 1 {
            debug_assert!(len2 > 0);
            copy_range(&mut **keys, cursor2, dest, len2);
            data.copy_range(cursor2, dest, len2);
            keys[dest + len2] = tmp[cursor1].clone();
            data.unstash(tmp_data, cursor1, dest + len2);
        } else if len1 == 0 {
            return Err(SortError::ComparatorContract);
        } else {
            debug_assert!(len2 == 0);
            debug_assert!(len1 > 1);
            keys[dest..dest + len1].clone_from_slice(&tmp[cursor1..cursor1 + len1]);
            data.unstash_range(tmp_data, cursor1, dest, len1);
        }
        Ok(())
    }

    /// Merges two contiguous runs back to front, with run 2 (the smaller)
    /// stashed in scratch. Mirror image of [`Sorter::merge_lo`]; cursor
    /// positions are derived from the remaining lengths, so the current run 1
    /// element sits at `base1 + len1 - 1`, the current stashed element at
    /// `len2 - 1`, and the destination at `base1 + len1 + len2 - 1`.
    fn merge_hi(
        &mut self,
        base1: usize,
        mut len1: usize,
        base2: usize,
        mut len2: usize,
    ) -> Result<(), SortError> {
        debug_assert!(len1 > 0 && len2 > 0 && base1 + len1 == base2);
        let Sorter {
            keys,
            data,
            is_less,
            tmp,
            tmp_data,
            state,
            ..
        } = self;

        tmp.clear();
        tmp.extend_from_slice(&keys[base2..base2 + len2]);
        data.stash(base2, len2, tmp_data);

        // Last element of run 1 is the maximum of the merged range.
        let dest = base1 + len1 + len2 - 1;
        keys[dest] = keys[base1 + len1 - 1].clone();
        data.copy(base1 + len1 - 1, dest);
        len1 -= 1;
        if len1 == 0 {
            keys[base1..base1 + len2].clone_from_slice(&tmp[..len2]);
            data.unstash_range(tmp_data, 0, base1, len2);
            return Ok(());
        }
        if len2 == 1 {
            copy_range(&mut **keys, base1, base1 + 1, len1);
            data.copy_range(base1, base1 + 1, len1);
            keys[base1] = tmp[0].clone();
            data.unstash(tmp_data, 0, base1);
            return Ok(());
        }

        let mut min_gallop = state.min_gallop;
        'outer: loop {
            let mut count1 = 0;
            let mut count2 = 0;

            loop {
                debug_assert!(len1 > 0 && len2 > 1);
                let dest = base1 + len1 + len2 - 1;
                if is_less(&tmp[len2 - 1], &keys[base1 + len1 - 1]) {
                    keys[dest] = keys[base1 + len1 - 1].clone();
                    data.copy(base1 + len1 - 1, dest);
                    count1 += 1;
                    count2 = 0;
                    len1 -= 1;
                    if len1 == 0 {
                        break 'outer;
                    }
                } else {
                    keys[dest] = tmp[len2 - 1].clone();
                    data.unstash(tmp_data, len2 - 1, dest);
                    count2 += 1;
                    count1 = 0;
                    len2 -= 1;
                    if len2 == 1 {
                        break 'outer;
                    }
                }
                if (count1 | count2) >= min_gallop {
                    break;
                }
            }

            state.stats.gallops += 1;
            loop {
                debug_assert!(len1 > 0 && len2 > 1);
                let keep = gallop_right(
                    &tmp[len2 - 1],
                    &**keys,
                    base1,
                    len1,
                    len1 - 1,
                    is_less,
                );
                count1 = len1 - keep;
                if count1 != 0 {
                    // Slide the winning tail of run 1 up in one block.
                    copy_range(&mut **keys, base1 + keep, base1 + keep + len2, count1);
                    data.copy_range(base1 + keep, base1 + keep + len2, count1);
                    len1 = keep;
                    if len1 == 0 {
                        break 'outer;
                    }
                }
                let dest = base1 + len1 + len2 - 1;
                keys[dest] = tmp[len2 - 1].clone();
                data.unstash(tmp_data, len2 - 1, dest);
                len2 -= 1;
                if len2 == 1 {
                    break 'outer;
                }

                let keep2 = gallop_left(
                    &keys[base1 + len1 - 1],
                    &**tmp,
                    0,
                    len2,
                    len2 - 1,
                    is_less,
                );
                count2 = len2 - keep2;
                if count2 != 0 {
                    keys[base1 + len1 + keep2..base1 + len1 + len2]
                        .clone_from_slice(&tmp[keep2..len2]);
                    data.unstash_range(tmp_data, keep2, base1 + len1 + keep2, count2);
                    len2 = keep2;
                    if len2 <= 1 {
                        break 'outer;
                    }
                }
                let dest = base1 + len1 + len2 - 1;
                keys[dest] = keys[base1 + len1 - 1].clone();
                data.copy(base1 + len1 - 1, dest);
                len1 -= 1;
                if len1 == 0 {
                    break 'outer;
                }
                min_gallop = min_gallop.saturating_sub(1);
                if !(count1 >= MIN_GALLOP || count2 >= MIN_GALLOP) {
                    break;
                }
            }
            min_gallop += 2;
        }
        state.min_gallop = min_gallop.max(1);

        if len2 == 1 {
            debug_assert!(len1 > 0);
            copy_range(&mut **keys, base1, base1 + 1, len1);
            data.copy_range(base1, base1 + 1, len1);
            keys[base1] = tmp[0].clone();
            data.unstash(tmp_data, 0, base1);
        } else if len2 == 0 {
            return Err(SortError::ComparatorContract);
        } else {
            debug_assert!(len1 == 0);
            debug_assert!(len2 > 0);
            keys[base1..base1 + len2].clone_from_slice(&tmp[..len2]);
            data.unstash_range(tmp_data, 0, base1, len2);
        }
        Ok(())
    }
}

/// Copies `len` elements from `src` to `dst` within `arr`; the ranges may
/// overlap in either direction.
fn copy_range<K: Clone>(arr: &mut [K], src: usize, dst: usize, len: usize) {
    if dst <= src {
        for i in 0..len {
            arr[dst + i] = arr[src + i].clone();
        }
    } else {
        for i in (0..len).rev() {
            arr[dst + i] = arr[src + i].clone();
        }
    }
}

/// Returns the first offset `k` in `[0, len]` such that
/// `arr[base + k] >= key`, i.e. the leftmost insertion point for `key`.
///
/// Probes exponentially outward from `hint` until the answer is bracketed,
/// then bisects the bracket. Cost is `O(log distance)` from the hint, which
/// is what makes galloping cheaper than a linear scan when one run is being
/// consumed in large chunks.
fn gallop_left<K, F>(
    key: &K,
    arr: &[K],
    base: usize,
    len: usize,
    hint: usize,
    is_less: &mut F,
) -> usize
where
    F: FnMut(&K, &K) -> bool,
{
    debug_assert!(len > 0 && hint < len);
    let mut lo;
    let mut hi;
    if is_less(&arr[base + hint], key) {
        // Gallop right until arr[hint + last_ofs] < key <= arr[hint + ofs].
        let max_ofs = len - hint;
        let mut last_ofs = 0;
        let mut ofs = 1;
        while ofs < max_ofs && is_less(&arr[base + hint + ofs], key) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        if ofs > max_ofs {
            ofs = max_ofs;
        }
        lo = hint + last_ofs + 1;
        hi = hint + ofs;
    } else {
        // Gallop left until arr[hint - ofs] < key <= arr[hint - last_ofs].
        let max_ofs = hint + 1;
        let mut last_ofs = 0;
        let mut ofs = 1;
        while ofs < max_ofs && !is_less(&arr[base + hint - ofs], key) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        if ofs > max_ofs {
            ofs = max_ofs;
        }
        lo = hint + 1 - ofs;
        hi = hint - last_ofs;
    }
    debug_assert!(lo <= hi && hi <= len);

    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        if is_less(&arr[base + mid], key) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    debug_assert_eq!(lo, hi);
    lo
}

/// Returns the first offset `k` in `[0, len]` such that
/// `arr[base + k] > key`, i.e. the rightmost insertion point for `key`.
fn gallop_right<K, F>(
    key: &K,
    arr: &[K],
    base: usize,
    len: usize,
    hint: usize,
    is_less: &mut F,
) -> usize
where
    F: FnMut(&K, &K) -> bool,
{
    debug_assert!(len > 0 && hint < len);
    let mut lo;
    let mut hi;
    if is_less(key, &arr[base + hint]) {
        // Gallop left until arr[hint - ofs] <= key < arr[hint - last_ofs].
        let max_ofs = hint + 1;
        let mut last_ofs = 0;
        let mut ofs = 1;
        while ofs < max_ofs && is_less(key, &arr[base + hint - ofs]) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        if ofs > max_ofs {
            ofs = max_ofs;
        }
        lo = hint + 1 - ofs;
        hi = hint - last_ofs;
    } else {
        // Gallop right until arr[hint + last_ofs] <= key < arr[hint + ofs].
        let max_ofs = len - hint;
        let mut last_ofs = 0;
        let mut ofs = 1;
        while ofs < max_ofs && !is_less(key, &arr[base + hint + ofs]) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        if ofs > max_ofs {
            ofs = max_ofs;
        }
        lo = hint + last_ofs + 1;
        hi = hint + ofs;
    }
    debug_assert!(lo <= hi && hi <= len);

    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        if is_less(key, &arr[base + mid]) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    debug_assert_eq!(lo, hi);
    lo
}

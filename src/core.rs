//! Core traits and types for tandemsort.
//!
//! This module defines:
//! - [`Satellite`]: the trait users implement to carry payload columns along
//!   with the sorted keys.
//! - [`SortStats`]: counters describing the work one sort call performed.
//! - Run: internal descriptor for a sorted slice awaiting merging.

use std::collections::TryReserveError;

/// A sorted, contiguous slice of the key column pending merging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Run {
    pub base: usize,
    pub len: usize,
}

/// Counters describing what one sort invocation did.
///
/// Returned by every entry point. A presorted input reports a single run and
/// no merges; a reverse-sorted input additionally reports one reversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Natural runs detected in the input.
    pub runs: usize,
    /// Descending runs that were reversed in place.
    pub reversed_runs: usize,
    /// Run-pair merges that actually moved elements.
    pub merges: usize,
    /// Times a merge switched into galloping mode.
    pub gallops: usize,
}

/// Satellite columns permuted in lockstep with the key column.
///
/// Every element movement the sort applies to the keys is applied through this
/// trait with the same source and destination indices, so each key keeps its
/// payload regardless of where it ends up. Satellite columns carry no ordering
/// semantics of their own.
///
/// The merge engine stashes a copy of the smaller run into
/// [`Satellite::Scratch`] storage and copies elements back out as the merge
/// proceeds; implementors own that scratch representation.
///
/// Implementations are provided for `()` (no payload), `[T]` and `Vec<T>` for
/// `T: Clone`, mutable references, and tuples of satellites up to arity four,
/// so multi-column callers can write:
///
/// ```
/// use tandemsort::prelude::*;
///
/// let mut keys = vec![3u64, 1, 2];
/// let mut ids = vec![30u32, 10, 20];
/// let mut names = vec!["c".to_string(), "a".to_string(), "b".to_string()];
///
/// tandemsort_with(&mut keys, &mut (&mut ids[..], &mut names[..]), 0, 3).unwrap();
///
/// assert_eq!(keys, vec![1, 2, 3]);
/// assert_eq!(ids, vec![10, 20, 30]);
/// assert_eq!(names, vec!["a", "b", "c"]);
/// ```
pub trait Satellite {
    /// Scratch storage holding a stashed run during a merge.
    type Scratch;

    /// Returns an empty scratch buffer.
    fn scratch(&self) -> Self::Scratch;

    /// Returns the length of the first column that does not match `keys_len`,
    /// or `None` when every column lines up.
    fn length_mismatch(&self, keys_len: usize) -> Option<usize>;

    /// Grows `scratch` so it can hold `capacity` stashed elements.
    fn reserve_scratch(
        &self,
        scratch: &mut Self::Scratch,
        capacity: usize,
    ) -> Result<(), TryReserveError>;

    /// Swaps the elements at `a` and `b` in every column.
    fn swap(&mut self, a: usize, b: usize);

    /// Copies the element at `src` over the element at `dst` in every column.
    fn copy(&mut self, src: usize, dst: usize);

    /// Stashes `len` elements starting at `src` into `scratch`, replacing any
    /// previous contents.
    fn stash(&self, src: usize, len: usize, scratch: &mut Self::Scratch);

    /// Copies the stashed element at `src` back into the columns at `dst`.
    fn unstash(&mut self, scratch: &Self::Scratch, src: usize, dst: usize);

    /// Reverses `lo..hi` in every column.
    fn reverse(&mut self, lo: usize, hi: usize) {
        let (mut lo, mut hi) = (lo, hi);
        while lo + 1 < hi {
            hi -= 1;
            self.swap(lo, hi);
            lo += 1;
        }
    }

    /// Rotates `lo..hi` right by one, moving its last element to the front.
    fn rotate_right(&mut self, lo: usize, hi: usize) {
        let mut i = hi;
        while i > lo + 1 {
            i -= 1;
            self.swap(i, i - 1);
        }
    }

    /// Copies `len` elements from `src` to `dst` within the columns. The two
    /// ranges may overlap.
    fn copy_range(&mut self, src: usize, dst: usize, len: usize) {
        if dst <= src {
            for i in 0..len {
                self.copy(src + i, dst + i);
            }
        } else {
            for i in (0..len).rev() {
                self.copy(src + i, dst + i);
            }
        }
    }

    /// Copies `len` stashed elements starting at `src` back into the columns
    /// starting at `dst`.
    fn unstash_range(&mut self, scratch: &Self::Scratch, src: usize, dst: usize, len: usize) {
        for i in 0..len {
            self.unstash(scratch, src + i, dst + i);
        }
    }
}

// Keys-only sorting: every operation is a no-op.
impl Satellite for () {
    type Scratch = ();

    fn scratch(&self) -> Self::Scratch {}

    fn length_mismatch(&self, _keys_len: usize) -> Option<usize> {
        None
    }

    fn reserve_scratch(
        &self,
        _scratch: &mut Self::Scratch,
        _capacity: usize,
    ) -> Result<(), TryReserveError> {
        Ok(())
    }

    fn swap(&mut self, _a: usize, _b: usize) {}

    fn copy(&mut self, _src: usize, _dst: usize) {}

    fn stash(&self, _src: usize, _len: usize, _scratch: &mut Self::Scratch) {}

    fn unstash(&mut self, _scratch: &Self::Scratch, _src: usize, _dst: usize) {}

    fn reverse(&mut self, _lo: usize, _hi: usize) {}

    fn rotate_right(&mut self, _lo: usize, _hi: usize) {}

    fn copy_range(&mut self, _src: usize, _dst: usize, _len: usize) {}

    fn unstash_range(&mut self, _scratch: &Self::Scratch, _src: usize, _dst: usize, _len: usize) {}
}

// Single column of clonable payloads. The range operations override the
// swap-based defaults with the slice primitives.
impl<T: Clone> Satellite for [T] {
    type Scratch = Vec<T>;

    fn scratch(&self) -> Self::Scratch {
        Vec::new()
    }

    fn length_mismatch(&self, keys_len: usize) -> Option<usize> {
        (self.len() != keys_len).then_some(self.len())
    }

    fn reserve_scratch(
        &self,
        scratch: &mut Self::Scratch,
        capacity: usize,
    ) -> Result<(), TryReserveError> {
        scratch.try_reserve_exact(capacity.saturating_sub(scratch.len()))
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.swap(a, b);
    }

    fn copy(&mut self, src: usize, dst: usize) {
        self[dst] = self[src].clone();
    }

    fn stash(&self, src: usize, len: usize, scratch: &mut Self::Scratch) {
        scratch.clear();
        scratch.extend_from_slice(&self[src..src + len]);
    }

    fn unstash(&mut self, scratch: &Self::Scratch, src: usize, dst: usize) {
        self[dst] = scratch[src].clone();
    }

    fn reverse(&mut self, lo: usize, hi: usize) {
        self[lo..hi].reverse();
    }

    fn rotate_right(&mut self, lo: usize, hi: usize) {
        self[lo..hi].rotate_right(1);
    }

    fn copy_range(&mut self, src: usize, dst: usize, len: usize) {
        if dst <= src {
            for i in 0..len {
                self[dst + i] = self[src + i].clone();
            }
        } else {
            for i in (0..len).rev() {
                self[dst + i] = self[src + i].clone();
            }
        }
    }

    fn unstash_range(&mut self, scratch: &Self::Scratch, src: usize, dst: usize, len: usize) {
        self[dst..dst + len].clone_from_slice(&scratch[src..src + len]);
    }
}

// Explicit Vec impl to improve ergonomics (avoiding .as_mut_slice()).
impl<T: Clone> Satellite for Vec<T> {
    type Scratch = Vec<T>;

    fn scratch(&self) -> Self::Scratch {
        Vec::new()
    }

    fn length_mismatch(&self, keys_len: usize) -> Option<usize> {
        self.as_slice().length_mismatch(keys_len)
    }

    fn reserve_scratch(
        &self,
        scratch: &mut Self::Scratch,
        capacity: usize,
    ) -> Result<(), TryReserveError> {
        self.as_slice().reserve_scratch(scratch, capacity)
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.as_mut_slice().swap(a, b);
    }

    fn copy(&mut self, src: usize, dst: usize) {
        Satellite::copy(self.as_mut_slice(), src, dst);
    }

    fn stash(&self, src: usize, len: usize, scratch: &mut Self::Scratch) {
        self.as_slice().stash(src, len, scratch);
    }

    fn unstash(&mut self, scratch: &Self::Scratch, src: usize, dst: usize) {
        self.as_mut_slice().unstash(scratch, src, dst);
    }

    fn reverse(&mut self, lo: usize, hi: usize) {
        Satellite::reverse(self.as_mut_slice(), lo, hi);
    }

    fn rotate_right(&mut self, lo: usize, hi: usize) {
        Satellite::rotate_right(self.as_mut_slice(), lo, hi);
    }

    fn copy_range(&mut self, src: usize, dst: usize, len: usize) {
        Satellite::copy_range(self.as_mut_slice(), src, dst, len);
    }

    fn unstash_range(&mut self, scratch: &Self::Scratch, src: usize, dst: usize, len: usize) {
        self.as_mut_slice().unstash_range(scratch, src, dst, len);
    }
}

// Forwarding impl so tuples can hold `&mut [T]` members directly.
impl<S: Satellite + ?Sized> Satellite for &mut S {
    type Scratch = S::Scratch;

    fn scratch(&self) -> Self::Scratch {
        (**self).scratch()
    }

    fn length_mismatch(&self, keys_len: usize) -> Option<usize> {
        (**self).length_mismatch(keys_len)
    }

    fn reserve_scratch(
        &self,
        scratch: &mut Self::Scratch,
        capacity: usize,
    ) -> Result<(), TryReserveError> {
        (**self).reserve_scratch(scratch, capacity)
    }

    fn swap(&mut self, a: usize, b: usize) {
        (**self).swap(a, b);
    }

    fn copy(&mut self, src: usize, dst: usize) {
        (**self).copy(src, dst);
    }

    fn stash(&self, src: usize, len: usize, scratch: &mut Self::Scratch) {
        (**self).stash(src, len, scratch);
    }

    fn unstash(&mut self, scratch: &Self::Scratch, src: usize, dst: usize) {
        (**self).unstash(scratch, src, dst);
    }

    fn reverse(&mut self, lo: usize, hi: usize) {
        (**self).reverse(lo, hi);
    }

    fn rotate_right(&mut self, lo: usize, hi: usize) {
        (**self).rotate_right(lo, hi);
    }

    fn copy_range(&mut self, src: usize, dst: usize, len: usize) {
        (**self).copy_range(src, dst, len);
    }

    fn unstash_range(&mut self, scratch: &Self::Scratch, src: usize, dst: usize, len: usize) {
        (**self).unstash_range(scratch, src, dst, len);
    }
}

// Multi-column stores as tuples of satellites, moved in lockstep.
macro_rules! impl_satellite_tuple {
    ($(($name:ident, $idx:tt)),+) => {
        impl<$($name: Satellite),+> Satellite for ($($name,)+) {
            type Scratch = ($($name::Scratch,)+);

            fn scratch(&self) -> Self::Scratch {
                ($(self.$idx.scratch(),)+)
            }

            fn length_mismatch(&self, keys_len: usize) -> Option<usize> {
                $(
                    if let Some(found) = self.$idx.length_mismatch(keys_len) {
                        return Some(found);
                    }
                )+
                None
            }

            fn reserve_scratch(
                &self,
                scratch: &mut Self::Scratch,
                capacity: usize,
            ) -> Result<(), TryReserveError> {
                $(self.$idx.reserve_scratch(&mut scratch.$idx, capacity)?;)+
                Ok(())
            }

            fn swap(&mut self, a: usize, b: usize) {
                $(self.$idx.swap(a, b);)+
            }

            fn copy(&mut self, src: usize, dst: usize) {
                $(self.$idx.copy(src, dst);)+
            }

            fn stash(&self, src: usize, len: usize, scratch: &mut Self::Scratch) {
                $(self.$idx.stash(src, len, &mut scratch.$idx);)+
            }

            fn unstash(&mut self, scratch: &Self::Scratch, src: usize, dst: usize) {
                $(self.$idx.unstash(&scratch.$idx, src, dst);)+
            }

            fn reverse(&mut self, lo: usize, hi: usize) {
                $(self.$idx.reverse(lo, hi);)+
            }

            fn rotate_right(&mut self, lo: usize, hi: usize) {
                $(self.$idx.rotate_right(lo, hi);)+
            }

            fn copy_range(&mut self, src: usize, dst: usize, len: usize) {
                $(self.$idx.copy_range(src, dst, len);)+
            }

            fn unstash_range(&mut self, scratch: &Self::Scratch, src: usize, dst: usize, len: usize) {
                $(self.$idx.unstash_range(&scratch.$idx, src, dst, len);)+
            }
        }
    };
}

impl_satellite_tuple!((A, 0), (B, 1));
impl_satellite_tuple!((A, 0), (B, 1), (C, 2));
impl_satellite_tuple!((A, 0), (B, 1), (C, 2), (D, 3));

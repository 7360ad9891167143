//! # Tandemsort
//!
//! `tandemsort` is an adaptive, stable, natural merge sort for columnar data:
//! it sorts a key column in place and permutes any number of satellite columns
//! in lockstep, so every key keeps its payload without materializing rows.
//!
//! The algorithm is a Timsort variant: it detects the runs already present in
//! the input, extends short ones with binary insertion sort, and merges runs
//! off a stack kept balanced by the classic Timsort invariant, switching to
//! **galloping mode** whenever one run dominates a merge.
//!
//! ## Key Features
//!
//! - **Adaptive**: already-sorted and reverse-sorted inputs are handled in
//!   `O(n)`; partially ordered data is merged in as few passes as its run
//!   structure allows.
//! - **Stable**: rows with equal keys keep their input order, which makes
//!   multi-pass sorting by successive keys meaningful.
//! - **Lockstep satellite columns**: the [`Satellite`] trait abstracts over
//!   payload storage, with implementations for slices, `Vec`s, and tuples of
//!   columns of independent types.
//! - **Galloping merges**: exponential search lets a merge consume long
//!   winning stretches of a run in `O(log n)` comparisons instead of one
//!   comparison per element.
//! - **Safe and fallible**: no `unsafe`; range, length, allocation, and
//!   comparator-contract failures are reported as [`SortError`] values.
//!
//! ## Usage
//!
//! ### Basic Usage
//!
//! Sort a key column and carry one payload column along:
//!
//! ```rust
//! use tandemsort::tandemsort_with;
//!
//! let mut keys = vec![5, 3, 3, 1, 4];
//! let mut tags = vec!["a", "b", "c", "d", "e"];
//!
//! tandemsort_with(&mut keys, &mut tags, 0, 5).unwrap();
//!
//! assert_eq!(keys, vec![1, 3, 3, 4, 5]);
//! // The two 3-keyed rows keep their original order: "b" before "c".
//! assert_eq!(tags, vec!["d", "b", "c", "e", "a"]);
//! ```
//!
//! ### Multiple Columns
//!
//! Tuples of columns are permuted together, each column keeping its own
//! element type:
//!
//! ```rust
//! use tandemsort::prelude::*;
//!
//! let mut keys = vec![3u64, 1, 2];
//! let mut ids = vec![30u32, 10, 20];
//! let mut names = vec!["c".to_string(), "a".to_string(), "b".to_string()];
//!
//! tandemsort_with(&mut keys, &mut (&mut ids[..], &mut names[..]), 0, 3).unwrap();
//!
//! assert_eq!(keys, vec![1, 2, 3]);
//! assert_eq!(ids, vec![10, 20, 30]);
//! assert_eq!(names, vec!["a", "b", "c"]);
//! ```
//!
//! ### Observing the sort
//!
//! Every call reports what it did via [`SortStats`]:
//!
//! ```rust
//! use tandemsort::tandemsort;
//!
//! let mut keys: Vec<u32> = (0..1000).collect();
//! let stats = tandemsort(&mut keys, 0, 1000).unwrap();
//!
//! // Presorted input: one run, nothing merged.
//! assert_eq!(stats.runs, 1);
//! assert_eq!(stats.merges, 0);
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Best Case**: O(n) comparisons for presorted or reverse-sorted input.
//! - **Worst Case**: O(n log n) comparisons and moves.
//! - **Memory Overhead**: scratch storage for the smaller run of each merge,
//!   at most half the column length, reused across merges and grown
//!   geometrically on demand.
//!
//! The whole sort runs synchronously on the calling thread and owns its
//! columns exclusively for the duration of the call; parallel callers should
//! partition their data and merge externally.

pub mod algo;
pub mod core;
pub mod error;

pub use algo::{tandemsort, tandemsort_by, tandemsort_with, tandemsort_with_by};
pub use core::{Satellite, SortStats};
pub use error::SortError;

pub mod prelude {
    pub use crate::algo::{tandemsort, tandemsort_by, tandemsort_with, tandemsort_with_by};
    pub use crate::core::{Satellite, SortStats};
    pub use crate::error::SortError;
}

//! Storage traces.
//!
//! The kernel schedules processes from a static description of the storage each
//! process may write during one invocation. A [`StorageTrace`] is one possible
//! sequence of writes; a [`StorageTraceSet`] is the set of alternatives. Two
//! operators build sets:
//! - `a ^ b`: either `a` or `b` (union of alternatives),
//! - `a * b`: `a` followed by `b` (every trace of `a` concatenated with every trace of `b`).
//!
//! [`StorageTraceSet::opt`] adds the empty trace, making a set optional.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitXor, BitXorAssign, Mul};

/// Handle of a storage element registered with the kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageId(pub u32);

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One ordered sequence of storage writes.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageTrace(Vec<StorageId>);

impl StorageTrace {
    /// Creates a trace from an ordered list of storages.
    pub fn new(storages: impl IntoIterator<Item = StorageId>) -> Self {
        Self(storages.into_iter().collect())
    }

    /// The storages in write order.
    pub fn storages(&self) -> &[StorageId] {
        &self.0
    }

    /// Whether the trace writes nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn concat(&self, other: &Self) -> Self {
        let mut storages = Vec::with_capacity(self.0.len() + other.0.len());
        storages.extend_from_slice(&self.0);
        storages.extend_from_slice(&other.0);
        Self(storages)
    }
}

impl fmt::Display for StorageTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, s) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{s}")?;
        }
        f.write_str(")")
    }
}

/// Set of alternative storage traces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageTraceSet {
    traces: BTreeSet<StorageTrace>,
}

impl StorageTraceSet {
    /// The empty set: the process never runs to completion.
    pub fn new() -> Self {
        Self::default()
    }

    /// The set holding only the empty trace: the process writes nothing.
    pub fn nothing() -> Self {
        Self::from_traces([StorageTrace::default()])
    }

    /// The set holding one single-write trace.
    pub fn single(storage: StorageId) -> Self {
        Self::from_traces([StorageTrace::new([storage])])
    }

    /// Builds a set from explicit traces.
    pub fn from_traces(traces: impl IntoIterator<Item = StorageTrace>) -> Self {
        Self {
            traces: traces.into_iter().collect(),
        }
    }

    /// This set, or nothing at all.
    #[must_use]
    pub fn opt(&self) -> Self {
        let mut res = self.clone();
        let _ = res.traces.insert(StorageTrace::default());
        res
    }

    /// Whether the set contains `trace`.
    pub fn contains(&self, trace: &[StorageId]) -> bool {
        self.traces.iter().any(|t| t.storages() == trace)
    }

    /// Number of alternative traces.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Whether the set holds no trace at all.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Iterates the traces in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &StorageTrace> {
        self.traces.iter()
    }
}

impl BitXorAssign<&Self> for StorageTraceSet {
    fn bitxor_assign(&mut self, rhs: &Self) {
        self.traces.extend(rhs.traces.iter().cloned());
    }
}

impl BitXor for &StorageTraceSet {
    type Output = StorageTraceSet;

    fn bitxor(self, rhs: Self) -> StorageTraceSet {
        let mut res = self.clone();
        res ^= rhs;
        res
    }
}

impl Mul for &StorageTraceSet {
    type Output = StorageTraceSet;

    fn mul(self, rhs: Self) -> StorageTraceSet {
        let traces = self
            .traces
            .iter()
            .flat_map(|a| rhs.traces.iter().map(move |b| a.concat(b)))
            .collect();
        StorageTraceSet { traces }
    }
}

impl fmt::Display for StorageTraceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, t) in self.traces.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{t}")?;
        }
        f.write_str("}")
    }
}

/// Every order in which any non-empty subset of `outputs` can be written, one
/// source after another and each source at most once.
///
/// This is the write side effect of a process that commits at most one result
/// per source per invocation while the sources interleave arbitrarily:
///
/// `perm(V) = ∪ over i ∉ V of ( out[i] ∪ out[i] · perm(V ∪ {i}) )`
///
/// # Examples
///
/// ```
/// use fpusim_core::sim::trace::{output_permutation, StorageId, StorageTraceSet};
///
/// let a = StorageTraceSet::single(StorageId(1));
/// let b = StorageTraceSet::single(StorageId(2));
/// let perm = output_permutation(&[a, b]);
/// assert_eq!(perm.len(), 4);
/// assert!(perm.contains(&[StorageId(1)]));
/// assert!(perm.contains(&[StorageId(2), StorageId(1)]));
/// assert!(!perm.contains(&[]));
/// ```
pub fn output_permutation(outputs: &[StorageTraceSet]) -> StorageTraceSet {
    fn permute(outputs: &[StorageTraceSet], visited: &mut [bool]) -> StorageTraceSet {
        let mut res = StorageTraceSet::new();
        for i in 0..outputs.len() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            let rest = permute(outputs, visited);
            visited[i] = false;

            res ^= &outputs[i];
            res ^= &(&outputs[i] * &rest);
        }
        res
    }

    let mut visited = vec![false; outputs.len()];
    permute(outputs, &mut visited)
}

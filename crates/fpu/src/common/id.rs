//! Index and handle types.
//!
//! Sources and units live in arenas owned by the [`Fpu`](crate::fpu::Fpu); these
//! newtypes keep an index into one arena from being used against another. Clients
//! are never owned by the FPU and are referred to only through a [`ClientId`].

use std::fmt;

/// Simulated cycle number.
pub type CycleNo = u64;

/// Index of an input source (one per registered client).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(pub usize);

/// Index of a physical execution unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub usize);

/// Opaque handle for a client that receives write-backs.
///
/// The value is chosen by the caller; the FPU only hands it back through
/// [`ClientPort`](crate::fpu::client::ClientPort) lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub usize);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source{}", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit{}", self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client{}", self.0)
    }
}

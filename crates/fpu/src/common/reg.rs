//! Register addresses.
//!
//! A result is written back into a client's register file one native word at a
//! time. A [`RegAddr`] names the first register of the destination; a result
//! spanning `K` words occupies registers `index .. index + K`.

use std::fmt;

/// Register file a destination lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegType {
    /// Integer register file.
    Integer,
    /// Floating-point register file.
    Float,
}

/// Address of one register in a client's register file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegAddr {
    /// Register file.
    pub reg_type: RegType,
    /// Register index within the file.
    pub index: u32,
}

impl RegAddr {
    /// Creates a floating-point register address.
    pub const fn float(index: u32) -> Self {
        Self {
            reg_type: RegType::Float,
            index,
        }
    }

    /// Creates an integer register address.
    pub const fn integer(index: u32) -> Self {
        Self {
            reg_type: RegType::Integer,
            index,
        }
    }

    /// Returns the address `offset` registers further into the same file.
    ///
    /// # Arguments
    ///
    /// * `offset` - Number of registers to skip (the sub-word index of a wide result).
    ///
    /// # Panics
    ///
    /// Panics if the index leaves the `u32` range; use
    /// [`checked_offset`](Self::checked_offset) for untrusted addresses.
    #[must_use]
    pub const fn offset(self, offset: u32) -> Self {
        match self.checked_offset(offset) {
            Some(addr) => addr,
            None => panic!("register index out of range"),
        }
    }

    /// Like [`offset`](Self::offset), but `None` if the index would overflow.
    #[must_use]
    pub const fn checked_offset(self, offset: u32) -> Option<Self> {
        match self.index.checked_add(offset) {
            Some(index) => Some(Self {
                reg_type: self.reg_type,
                index,
            }),
            None => None,
        }
    }
}

impl fmt::Display for RegAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reg_type {
            RegType::Integer => write!(f, "$r{}", self.index),
            RegType::Float => write!(f, "$f{}", self.index),
        }
    }
}

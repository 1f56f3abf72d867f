//! Operand/result codec.
//!
//! Converts between host doubles and the binary form of a destination register of
//! a given width, and slices that binary form into native integer words:
//! 1. **Widths:** 4-byte (single) and 8-byte (double) destinations.
//! 2. **Words:** A destination spans `width / integer_bytes` registers; one word is
//!    written per register.
//! 3. **Endianness:** With big-endian sub-word ordering, register 0 receives the most
//!    significant word.

/// Destination float width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FloatWidth {
    /// IEEE-754 binary32.
    Single,
    /// IEEE-754 binary64.
    Double,
}

impl FloatWidth {
    /// Maps a byte size to a width.
    ///
    /// # Returns
    ///
    /// `None` for sizes other than 4 and 8.
    pub const fn from_bytes(size: usize) -> Option<Self> {
        match size {
            4 => Some(Self::Single),
            8 => Some(Self::Double),
            _ => None,
        }
    }

    /// Size of the width in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Self::Single => 4,
            Self::Double => 8,
        }
    }
}

/// Value/bit conversion at a configured native integer width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloatCodec {
    integer_bytes: usize,
    big_endian: bool,
}

impl FloatCodec {
    /// Creates a codec.
    ///
    /// # Arguments
    ///
    /// * `integer_bytes` - Native integer width in bytes (4 or 8).
    /// * `big_endian` - Whether sub-word 0 holds the most significant bits.
    ///
    /// # Panics
    ///
    /// Panics if `integer_bytes` is not 4 or 8; configuration validation rejects
    /// other widths before a codec is built.
    pub fn new(integer_bytes: usize, big_endian: bool) -> Self {
        assert!(
            matches!(integer_bytes, 4 | 8),
            "native integer width must be 4 or 8 bytes"
        );
        Self {
            integer_bytes,
            big_endian,
        }
    }

    /// Native integer width in bytes.
    pub const fn integer_bytes(&self) -> usize {
        self.integer_bytes
    }

    /// Whether sub-words are ordered most significant first.
    pub const fn big_endian(&self) -> bool {
        self.big_endian
    }

    /// Returns the width for `size` if this codec can write it back, i.e. `size` is a
    /// float width and a positive multiple of the native integer width.
    pub const fn width_for(&self, size: usize) -> Option<FloatWidth> {
        if size == 0 || size % self.integer_bytes != 0 {
            return None;
        }
        FloatWidth::from_bytes(size)
    }

    /// Number of native words a destination of `width` spans.
    pub const fn words(&self, width: FloatWidth) -> usize {
        width.bytes() / self.integer_bytes
    }

    /// Encodes `value` at `width`.
    ///
    /// Single precision rounds through `f32`; the bit pattern (including any NaN
    /// payload) is kept verbatim.
    pub fn encode(value: f64, width: FloatWidth) -> u64 {
        match width {
            FloatWidth::Single => u64::from((value as f32).to_bits()),
            FloatWidth::Double => value.to_bits(),
        }
    }

    /// Decodes the bit pattern of a `width`-wide register back into a double.
    pub fn decode(bits: u64, width: FloatWidth) -> f64 {
        match width {
            FloatWidth::Single => f64::from(f32::from_bits(bits as u32)),
            FloatWidth::Double => f64::from_bits(bits),
        }
    }

    /// Rounds `value` to what a `width`-wide register would hold.
    pub fn narrow(value: f64, width: FloatWidth) -> f64 {
        Self::decode(Self::encode(value, width), width)
    }

    /// Extracts sub-word `index` of `value` encoded at `width`.
    ///
    /// # Arguments
    ///
    /// * `value` - Result value.
    /// * `width` - Destination width.
    /// * `index` - Sub-word index, `0..words(width)`, in register order.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpusim_core::fpu::codec::{FloatCodec, FloatWidth};
    ///
    /// let le = FloatCodec::new(4, false);
    /// let be = FloatCodec::new(4, true);
    /// // 1.0 == 0x3FF0_0000_0000_0000
    /// assert_eq!(le.word(1.0, FloatWidth::Double, 0), 0x0000_0000);
    /// assert_eq!(le.word(1.0, FloatWidth::Double, 1), 0x3FF0_0000);
    /// assert_eq!(be.word(1.0, FloatWidth::Double, 0), 0x3FF0_0000);
    /// ```
    pub fn word(&self, value: f64, width: FloatWidth, index: usize) -> u64 {
        let words = self.words(width);
        debug_assert!(index < words, "sub-word index out of range");
        let slot = if self.big_endian {
            words - 1 - index
        } else {
            index
        };
        let bits = Self::encode(value, width);
        let shift = self.integer_bytes * 8 * slot;
        (bits >> shift) & self.word_mask()
    }

    /// Reassembles the register words of a result (in register order) into its bit pattern.
    pub fn join(&self, words: &[u64]) -> u64 {
        let count = words.len();
        words.iter().enumerate().fold(0, |acc, (i, &w)| {
            let slot = if self.big_endian { count - 1 - i } else { i };
            acc | ((w & self.word_mask()) << (self.integer_bytes * 8 * slot))
        })
    }

    fn word_mask(&self) -> u64 {
        if self.integer_bytes == 8 {
            u64::MAX
        } else {
            (1u64 << (self.integer_bytes * 8)) - 1
        }
    }
}

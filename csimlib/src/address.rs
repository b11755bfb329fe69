use std::error::Error;
use std::fmt::{Display, Formatter};

/// Largest supported number of set index bits. Every set is allocated up front, so this bounds
/// the allocation made when a simulation starts
pub const MAX_SET_INDEX_BITS: u32 = 24;

/// Largest supported number of cache lines across all sets
pub const MAX_TOTAL_LINES: u64 = 1 << 24;

/// Errors raised when a cache geometry can't be simulated
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GeometryError {
    /// One of S, E or B was negative
    Negative { parameter: &'static str, value: i64 },
    /// More set index bits than we are willing to allocate sets for
    TooManySets { set_index_bits: u32 },
    /// The set index and block offset don't fit in a 64-bit address
    AddressTooWide { set_index_bits: u32, block_offset_bits: u32 },
    /// The total number of lines is too large to allocate
    ///
    /// This is a limit of the implementation rather than an invalid geometry: the timestamp
    /// representation allocates every line up front, so the cap applies to both representations
    /// to keep them interchangeable
    TooManyLines { num_sets: u64, associativity: u64 },
}

impl Display for GeometryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::Negative { parameter, value } => {
                write!(f, "{parameter} must not be negative, got {value}")
            }
            GeometryError::TooManySets { set_index_bits } => {
                write!(f, "{set_index_bits} set index bits is more than the supported maximum of {MAX_SET_INDEX_BITS}")
            }
            GeometryError::AddressTooWide { set_index_bits, block_offset_bits } => {
                write!(f, "set index bits ({set_index_bits}) plus block offset bits ({block_offset_bits}) exceed the 64-bit address width")
            }
            GeometryError::TooManyLines { num_sets, associativity } => {
                write!(f, "{num_sets} sets of {associativity} lines is more than the supported maximum of {MAX_TOTAL_LINES} lines")
            }
        }
    }
}

impl Error for GeometryError {}

/// The shape of a cache: 2^S sets of E lines, each line holding a block of 2^B bytes
///
/// Geometries can only be built through [`Geometry::new`], so every instance has been validated
/// and decoding an address can never overflow
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Geometry {
    set_index_bits: u32,
    associativity: usize,
    block_offset_bits: u32,
}

/// An address split into the set it maps to and the tag identifying its block within that set
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecodedAddress {
    pub set: usize,
    pub tag: u64,
}

impl Geometry {
    pub fn new(set_index_bits: u32, associativity: usize, block_offset_bits: u32) -> Result<Self, GeometryError> {
        if set_index_bits > MAX_SET_INDEX_BITS {
            return Err(GeometryError::TooManySets { set_index_bits });
        }
        if set_index_bits.checked_add(block_offset_bits).map_or(true, |bits| bits > u64::BITS) {
            return Err(GeometryError::AddressTooWide { set_index_bits, block_offset_bits });
        }
        let num_sets = 1u64 << set_index_bits;
        let total_lines = num_sets.checked_mul(associativity as u64);
        if total_lines.map_or(true, |lines| lines > MAX_TOTAL_LINES) {
            return Err(GeometryError::TooManyLines { num_sets, associativity: associativity as u64 });
        }
        Ok(Self {
            set_index_bits,
            associativity,
            block_offset_bits,
        })
    }

    pub fn set_index_bits(&self) -> u32 {
        self.set_index_bits
    }

    pub fn associativity(&self) -> usize {
        self.associativity
    }

    pub fn block_offset_bits(&self) -> u32 {
        self.block_offset_bits
    }

    pub fn num_sets(&self) -> usize {
        1 << self.set_index_bits
    }

    /// Splits an address into its set index and tag
    ///
    /// The set index is the S bits directly above the block offset, the tag is everything above
    /// those. Shifting out all 64 bits yields 0 rather than wrapping
    ///
    /// # Arguments
    ///
    /// * `address`: Any 64-bit address, all of which are valid
    ///
    /// returns: DecodedAddress
    ///
    /// # Examples
    ///
    /// ```
    /// use csimlib::address::Geometry;
    /// let geometry = Geometry::new(4, 1, 4).unwrap();
    /// let decoded = geometry.decode(0x210);
    /// assert_eq!((decoded.set, decoded.tag), (1, 2));
    /// ```
    #[inline(always)]
    pub fn decode(&self, address: u64) -> DecodedAddress {
        let set_mask = (1u64 << self.set_index_bits) - 1;
        let set = address.checked_shr(self.block_offset_bits).unwrap_or(0) & set_mask;
        let tag = address
            .checked_shr(self.block_offset_bits + self.set_index_bits)
            .unwrap_or(0);
        DecodedAddress { set: set as usize, tag }
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "s={} E={} b={}", self.set_index_bits, self.associativity, self.block_offset_bits)
    }
}

use serde::{Deserialize, Serialize};
use crate::address::{Geometry, GeometryError};

/// A configuration for a single simulated cache
///
/// The geometry is kept exactly as supplied, signed, so that negative values reach validation and
/// are reported rather than rejected by the parser
#[derive(Debug, Clone, Deserialize, Serialize, Eq, PartialEq)]
pub struct CacheConfig {
    pub set_index_bits: i64,
    pub associativity: i64,
    pub block_offset_bits: i64,
    #[serde(default = "Representation::default")]
    pub representation: Representation,
}

/// How each set tracks recency. Both representations produce identical results. Defaults to
/// linked.
#[derive(Debug, Copy, Clone, Deserialize, Serialize, Eq, PartialEq, clap::ValueEnum)]
pub enum Representation {
    /// Doubly-linked recency list, O(1) per access
    #[serde(alias = "linked", alias = "list")]
    Linked,
    /// Array of lines with logical timestamps, O(E) per access
    #[serde(alias = "timestamp", alias = "array")]
    Timestamp,
}

impl Default for Representation {
    fn default() -> Self {
        Representation::Linked
    }
}

impl CacheConfig {
    pub fn new(set_index_bits: i64, associativity: i64, block_offset_bits: i64) -> Self {
        Self {
            set_index_bits,
            associativity,
            block_offset_bits,
            representation: Representation::default(),
        }
    }

    /// Validates the configured geometry
    ///
    /// Fails if any parameter is negative, or if the geometry can't be simulated
    pub fn geometry(&self) -> Result<Geometry, GeometryError> {
        let s = non_negative("set index bits (s)", self.set_index_bits)?;
        let e = non_negative("associativity (E)", self.associativity)?;
        let b = non_negative("block offset bits (b)", self.block_offset_bits)?;
        // Anything too wide for the narrower types is too wide for the geometry too
        let s = u32::try_from(s).map_err(|_| GeometryError::TooManySets { set_index_bits: u32::MAX })?;
        let b = u32::try_from(b).map_err(|_| GeometryError::AddressTooWide { set_index_bits: s, block_offset_bits: u32::MAX })?;
        let e = usize::try_from(e).map_err(|_| GeometryError::TooManyLines { num_sets: 1 << s.min(63), associativity: e })?;
        Geometry::new(s, e, b)
    }
}

fn non_negative(parameter: &'static str, value: i64) -> Result<u64, GeometryError> {
    u64::try_from(value).map_err(|_| GeometryError::Negative { parameter, value })
}

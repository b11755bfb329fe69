use std::fmt::{Display, Formatter};
use crate::address::{DecodedAddress, Geometry};
use crate::lru::{LinkedLruSet, LruSet, TimestampLruSet};

/// The result of a single access to the cache
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    Hit,
    Miss,
    /// A miss which also replaced the least recently used line of a full set
    MissWithEviction,
}

impl Outcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, Outcome::Hit)
    }

    pub fn is_eviction(&self) -> bool {
        matches!(self, Outcome::MissWithEviction)
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Hit => write!(f, "hit"),
            Outcome::Miss => write!(f, "miss"),
            Outcome::MissWithEviction => write!(f, "miss eviction"),
        }
    }
}

/// A generic trait for caches
///
/// As with the sets, this lets the simulator drive either representation through static dispatch
pub trait CacheTrait {
    /// Converts an address into the set it maps to and its tag
    fn address_to_set_and_tag(&self, input: u64) -> DecodedAddress;

    /// Accesses the line holding an address, returning whether it hit, missed, or evicted
    ///
    /// On every access the implementation must update the recency order of the set involved
    fn access(&mut self, input: u64) -> Outcome;

    fn geometry(&self) -> &Geometry;

    /// Gets the number of valid lines across all sets. Useful for debugging
    fn get_occupied_line_count(&self) -> usize;

    /// Gets the tags held by one set, most recently used first
    fn get_set_tags(&self, set: usize) -> Vec<u64>;
}

/// A cache of 2^S sets, parameterised by the representation of each set
///
/// All sets are allocated when the cache is created and owned by it, so dropping the cache
/// releases everything
pub struct Cache<S: LruSet> {
    geometry: Geometry,
    sets: Vec<S>,
}

impl<S: LruSet> Cache<S> {
    pub fn new(geometry: Geometry) -> Self {
        let sets = (0..geometry.num_sets()).map(|_| S::new(geometry.associativity())).collect();
        Self { geometry, sets }
    }
}

impl<S: LruSet> CacheTrait for Cache<S> {
    #[inline(always)]
    fn address_to_set_and_tag(&self, input: u64) -> DecodedAddress {
        self.geometry.decode(input)
    }

    fn access(&mut self, input: u64) -> Outcome {
        let DecodedAddress { set, tag } = self.address_to_set_and_tag(input);
        // Sets are indexed with the masked set bits, so this is always in bounds
        self.sets[set].access(tag)
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn get_occupied_line_count(&self) -> usize {
        self.sets.iter().map(|set| set.len()).sum()
    }

    fn get_set_tags(&self, set: usize) -> Vec<u64> {
        self.sets.get(set).map(|s| s.tags_by_recency()).unwrap_or_default()
    }
}

/// Enum for both set representations provided by the library
///
/// Branching explicitly on the representation keeps the concrete types visible to the compiler,
/// so the per-access call is inlined rather than going through a trait object
pub enum GenericCache {
    Linked(Cache<LinkedLruSet>),
    Timestamp(Cache<TimestampLruSet>),
}

impl From<Cache<LinkedLruSet>> for GenericCache {
    fn from(value: Cache<LinkedLruSet>) -> Self {
        Self::Linked(value)
    }
}

impl From<Cache<TimestampLruSet>> for GenericCache {
    fn from(value: Cache<TimestampLruSet>) -> Self {
        Self::Timestamp(value)
    }
}

impl CacheTrait for GenericCache {
    fn address_to_set_and_tag(&self, input: u64) -> DecodedAddress {
        match self {
            GenericCache::Linked(c) => c.address_to_set_and_tag(input),
            GenericCache::Timestamp(c) => c.address_to_set_and_tag(input),
        }
    }

    fn access(&mut self, input: u64) -> Outcome {
        match self {
            GenericCache::Linked(c) => c.access(input),
            GenericCache::Timestamp(c) => c.access(input),
        }
    }

    fn geometry(&self) -> &Geometry {
        match self {
            GenericCache::Linked(c) => c.geometry(),
            GenericCache::Timestamp(c) => c.geometry(),
        }
    }

    fn get_occupied_line_count(&self) -> usize {
        match self {
            GenericCache::Linked(c) => c.get_occupied_line_count(),
            GenericCache::Timestamp(c) => c.get_occupied_line_count(),
        }
    }

    fn get_set_tags(&self, set: usize) -> Vec<u64> {
        match self {
            GenericCache::Linked(c) => c.get_set_tags(set),
            GenericCache::Timestamp(c) => c.get_set_tags(set),
        }
    }
}

//! # CsimLib
//!
//! Csimlib simulates a set-associative cache with least recently used replacement over a memory
//! trace, counting hits, misses, and evictions
//!
//! Only cache metadata is modelled, no data is stored. Each set can be represented either as a
//! doubly-linked recency list or as an array of timestamped lines; both give identical results

/// Contains the cache geometry and the decoding of addresses into sets and tags
pub mod address;

/// Contains the cache implementation, parameterised by set representation, and a utility enum for
/// both representations
pub mod cache;

/// Contains definitions for the JSON configuration format
pub mod config;

/// Contains helpers for opening trace files
pub mod io;

/// Contains the set representations, with a trait for implementing new ones
pub mod lru;

/// Contains the simulator used to drive a cache with a trace
pub mod simulator;

/// Contains the trace record format and a streaming reader for it
pub mod trace;

#[cfg(test)]
mod test;

/// Contains utilities for running the fixture tests and benchmarks.
pub mod util;

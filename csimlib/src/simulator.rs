use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use crate::address::{Geometry, GeometryError};
use crate::cache::{Cache, CacheTrait, GenericCache, Outcome};
use crate::config::{CacheConfig, Representation};
use crate::lru::{LinkedLruSet, TimestampLruSet};
use crate::trace::{Operation, TraceReader, TraceRecord};

/// The simulator drives a cache with trace records, and collects results.
///
/// It supports calling simulate multiple times, continuing from the cache state left by the
/// previous call, and will update the time taken to simulate and the results accordingly
pub struct Simulator {
    cache: GenericCache,
    result: SimulationResult,
    simulation_time: Duration,
    records_applied: u64,
    stopped_at: Option<usize>,
}

/// The hit, miss, and eviction totals of a simulation. Can be serialised to JSON
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl SimulationResult {
    /// Adds a single access outcome to the totals
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Hit => self.hits += 1,
            Outcome::Miss => self.misses += 1,
            Outcome::MissWithEviction => {
                self.misses += 1;
                self.evictions += 1;
            }
        }
    }

    /// The total number of cache accesses made
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// The result in the `<hits> <misses> <evictions>` format used by results files
    pub fn to_results_line(&self) -> String {
        format!("{} {} {}\n", self.hits, self.misses, self.evictions)
    }
}

impl Display for SimulationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "hits:{} misses:{} evictions:{}", self.hits, self.misses, self.evictions)
    }
}

/// The outcomes of the cache accesses made for one trace record
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RecordOutcome {
    /// Instruction fetches don't touch the data cache
    Skipped,
    Single(Outcome),
    /// A modify is a load followed by a store
    Double(Outcome, Outcome),
}

impl Display for RecordOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordOutcome::Skipped => Ok(()),
            RecordOutcome::Single(outcome) => write!(f, " {outcome}"),
            RecordOutcome::Double(first, second) => write!(f, " {first} {second}"),
        }
    }
}

impl Simulator {
    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: A cache configuration, from JSON or the command line
    ///
    /// returns: Result<Simulator, GeometryError>, failing if the geometry is invalid
    pub fn new(config: &CacheConfig) -> Result<Self, GeometryError> {
        Ok(Self::with_geometry(config.geometry()?, config.representation))
    }

    /// Creates a new simulator for an already validated geometry
    pub fn with_geometry(geometry: Geometry, representation: Representation) -> Self {
        let cache = match representation {
            Representation::Linked => GenericCache::from(Cache::<LinkedLruSet>::new(geometry)),
            Representation::Timestamp => GenericCache::from(Cache::<TimestampLruSet>::new(geometry)),
        };
        Self {
            cache,
            result: SimulationResult::default(),
            simulation_time: Duration::new(0, 0),
            records_applied: 0,
            stopped_at: None,
        }
    }

    /// Accesses a single address, folding the outcome into the result
    pub fn access(&mut self, address: u64) -> Outcome {
        let outcome = self.cache.access(address);
        self.result.record(outcome);
        outcome
    }

    /// Applies one trace record to the cache
    ///
    /// The second access of a modify always hits unless the cache has no lines, the first access
    /// has just made that line the most recently used in its set
    pub fn apply(&mut self, record: &TraceRecord) -> RecordOutcome {
        self.records_applied += 1;
        match record.operation {
            Operation::Instruction => RecordOutcome::Skipped,
            Operation::Load | Operation::Store => RecordOutcome::Single(self.access(record.address)),
            Operation::Modify => {
                let load = self.access(record.address);
                let store = self.access(record.address);
                debug_assert!(store.is_hit() || self.cache.geometry().associativity() == 0);
                RecordOutcome::Double(load, store)
            }
        }
    }

    /// Applies records in order
    pub fn simulate_records<'a, I: IntoIterator<Item = &'a TraceRecord>>(&mut self, records: I) -> &SimulationResult {
        let start = Instant::now();
        for record in records {
            self.apply(record);
        }
        self.simulation_time += start.elapsed();
        &self.result
    }

    /// Simulates the cache on a textual trace
    ///
    /// Reading stops at the end of the input or at the first malformed line, whichever comes
    /// first; either way the result so far is returned. Only I/O errors fail
    ///
    /// # Arguments
    ///
    /// * `reader`: The trace, one record per line
    ///
    /// returns: Result<&SimulationResult, String>
    pub fn simulate<Source: BufRead>(&mut self, reader: Source) -> Result<&SimulationResult, String> {
        self.run(reader, |_, _| Ok(()))
    }

    /// As [`Simulator::simulate`], additionally writing each record and its outcomes to `out`,
    /// e.g. `L 10,1 miss eviction`
    pub fn simulate_verbose<Source: BufRead, W: Write>(&mut self, reader: Source, out: &mut W) -> Result<&SimulationResult, String> {
        self.run(reader, |record, outcome| {
            writeln!(out, "{record}{outcome}").map_err(|e| format!("Couldn't write the verbose output: {e}"))
        })
    }

    fn run<Source, F>(&mut self, reader: Source, mut on_record: F) -> Result<&SimulationResult, String>
    where
        Source: BufRead,
        F: FnMut(&TraceRecord, &RecordOutcome) -> Result<(), String>,
    {
        let start = Instant::now();
        let mut records = TraceReader::new(reader);
        for record in records.by_ref() {
            let record = record.map_err(|e| format!("Couldn't read the trace: {e}"))?;
            let outcome = self.apply(&record);
            on_record(&record, &outcome)?;
        }
        self.stopped_at = records.stopped_at();
        self.simulation_time += start.elapsed();
        Ok(&self.result)
    }

    pub fn result(&self) -> &SimulationResult {
        &self.result
    }

    pub fn cache(&self) -> &GenericCache {
        &self.cache
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of records applied so far, including instruction fetches
    pub fn get_records_applied(&self) -> u64 {
        self.records_applied
    }

    /// The line number of the malformed line which ended the last textual trace, if any
    pub fn get_stopped_at(&self) -> Option<usize> {
        self.stopped_at
    }

    /// Gets the number of valid and vacant lines in the cache
    pub fn get_line_occupancy(&self) -> (usize, usize) {
        let geometry = self.cache.geometry();
        let total = geometry.num_sets() * geometry.associativity();
        let occupied = self.cache.get_occupied_line_count();
        (occupied, total - occupied)
    }
}

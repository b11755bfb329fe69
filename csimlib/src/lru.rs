use std::collections::HashMap;
use crate::cache::Outcome;

/// A single associative set under least recently used replacement. Used to parameterise a Cache.
///
/// Implementations may store their lines however they like, but given the same sequence of tags
/// they must produce the same outcomes and evict the same lines. Recency is a strict total order:
/// every hit and every insertion makes the touched line the most recently used
pub trait LruSet {
    /// Creates an empty set which holds at most `associativity` valid lines
    fn new(associativity: usize) -> Self;

    /// Looks up a tag, updating recency on a hit and installing the tag on a miss
    ///
    /// A set with associativity 0 can never hold a line, so every access is a plain miss
    ///
    /// # Arguments
    ///
    /// * `tag`: The tag of the block being accessed
    ///
    /// returns: Outcome
    fn access(&mut self, tag: u64) -> Outcome;

    /// The number of valid lines currently held
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The tags of all valid lines, most recently used first
    fn tags_by_recency(&self) -> Vec<u64>;
}

const HEAD: usize = 0;
const TAIL: usize = 1;

#[derive(Debug, Copy, Clone)]
struct Node {
    tag: u64,
    prev: usize,
    next: usize,
}

/// Move-to-front recency list
///
/// Nodes live in an arena owned by the set, and link to each other by index. The first two
/// entries are the head and tail sentinels; every other node is a valid line. Nodes are only ever
/// appended until the set is full, after which the tail node is unlinked and recycled on each
/// eviction. The tag index makes probing, promotion, and eviction O(1) whatever the associativity
#[derive(Debug, Clone)]
pub struct LinkedLruSet {
    nodes: Vec<Node>,
    slots: HashMap<u64, usize>,
    associativity: usize,
}

impl LinkedLruSet {
    fn unlink(&mut self, index: usize) {
        let Node { prev, next, .. } = self.nodes[index];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn push_front(&mut self, index: usize) {
        let first = self.nodes[HEAD].next;
        self.nodes[index].prev = HEAD;
        self.nodes[index].next = first;
        self.nodes[first].prev = index;
        self.nodes[HEAD].next = index;
    }
}

impl LruSet for LinkedLruSet {
    fn new(associativity: usize) -> Self {
        let sentinel = Node { tag: 0, prev: HEAD, next: TAIL };
        Self {
            nodes: vec![sentinel, sentinel],
            slots: HashMap::new(),
            associativity,
        }
    }

    fn access(&mut self, tag: u64) -> Outcome {
        if let Some(&index) = self.slots.get(&tag) {
            self.unlink(index);
            self.push_front(index);
            return Outcome::Hit;
        }
        if self.associativity == 0 {
            return Outcome::Miss;
        }
        if self.len() < self.associativity {
            let index = self.nodes.len();
            self.nodes.push(Node { tag, prev: HEAD, next: TAIL });
            self.push_front(index);
            self.slots.insert(tag, index);
            return Outcome::Miss;
        }
        // Full, recycle the least recently used node
        let victim = self.nodes[TAIL].prev;
        self.unlink(victim);
        self.slots.remove(&self.nodes[victim].tag);
        self.nodes[victim].tag = tag;
        self.slots.insert(tag, victim);
        self.push_front(victim);
        Outcome::MissWithEviction
    }

    fn len(&self) -> usize {
        self.nodes.len() - 2
    }

    fn tags_by_recency(&self) -> Vec<u64> {
        let mut tags = Vec::with_capacity(self.len());
        let mut index = self.nodes[HEAD].next;
        while index != TAIL {
            tags.push(self.nodes[index].tag);
            index = self.nodes[index].next;
        }
        tags
    }
}

/// Metadata for one line of a [`TimestampLruSet`]
#[derive(Debug, Copy, Clone, Default)]
pub struct CacheLine {
    pub valid: bool,
    pub tag: u64,
    last_used: u64,
}

/// Flat array of lines stamped with a logical clock
///
/// The clock ticks on every access to the set, so no two lines ever share a timestamp and the
/// line with the smallest one is always the unique least recently used. Finding it is a linear
/// scan, making every access O(E); for small associativities this is usually still faster than
/// the linked representation
#[derive(Debug, Clone)]
pub struct TimestampLruSet {
    lines: Vec<CacheLine>,
    time: u64,
}

impl TimestampLruSet {
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }
}

impl LruSet for TimestampLruSet {
    fn new(associativity: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); associativity],
            time: 0,
        }
    }

    fn access(&mut self, tag: u64) -> Outcome {
        let now = self.time;
        self.time += 1;
        for line in self.lines.iter_mut() {
            if line.valid && line.tag == tag {
                line.last_used = now;
                return Outcome::Hit;
            }
        }
        if let Some(line) = self.lines.iter_mut().find(|line| !line.valid) {
            *line = CacheLine { valid: true, tag, last_used: now };
            return Outcome::Miss;
        }
        if self.lines.is_empty() {
            return Outcome::Miss;
        }
        let mut min_value = u64::MAX;
        let mut min_index = 0;
        for (index, line) in self.lines.iter().enumerate() {
            if line.last_used < min_value {
                min_value = line.last_used;
                min_index = index;
            }
        }
        self.lines[min_index] = CacheLine { valid: true, tag, last_used: now };
        Outcome::MissWithEviction
    }

    fn len(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }

    fn tags_by_recency(&self) -> Vec<u64> {
        let mut valid = self.lines.iter().filter(|line| line.valid).collect::<Vec<_>>();
        valid.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        valid.iter().map(|line| line.tag).collect()
    }
}

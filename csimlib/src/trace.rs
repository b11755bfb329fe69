use std::fmt::{Display, Formatter};
use std::io::{self, BufRead};
use lazy_static::lazy_static;
use regex::bytes::Regex;

lazy_static! {
    // " L 7ff000398,8" - the leading space is cosmetic, "I" lines have none. Addresses may carry a
    // 0x prefix and any number of leading zeros, but at most 16 significant digits
    static ref RECORD_PATTERN: Regex =
        Regex::new(r"^\s*(?P<op>[ILSM])\s+(?:0[xX])?0*(?P<address>[0-9a-fA-F]{1,16}),(?P<size>[0-9]+)\s*$").unwrap();
}

/// The kind of memory access a trace record describes
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Operation {
    /// Instruction fetch, ignored by the data cache
    Instruction,
    Load,
    Store,
    /// A load immediately followed by a store to the same address
    Modify,
}

impl Operation {
    /// The number of cache accesses this operation makes
    pub fn access_count(&self) -> u64 {
        match self {
            Operation::Instruction => 0,
            Operation::Load | Operation::Store => 1,
            Operation::Modify => 2,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            b'I' => Some(Operation::Instruction),
            b'L' => Some(Operation::Load),
            b'S' => Some(Operation::Store),
            b'M' => Some(Operation::Modify),
            _ => None,
        }
    }

    fn code(&self) -> char {
        match self {
            Operation::Instruction => 'I',
            Operation::Load => 'L',
            Operation::Store => 'S',
            Operation::Modify => 'M',
        }
    }
}

/// One line of a memory trace
///
/// The size is kept so records can be echoed back, it never affects the simulation
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TraceRecord {
    pub operation: Operation,
    pub address: u64,
    pub size: u32,
}

impl TraceRecord {
    pub fn new(operation: Operation, address: u64, size: u32) -> Self {
        Self { operation, address, size }
    }

    /// Parses a single trace line, without its line terminator
    ///
    /// Returns None if the line doesn't follow the `<op> <hex address>,<decimal size>` format,
    /// including addresses wider than 64 bits and sizes which don't fit in a u32
    ///
    /// # Examples
    ///
    /// ```
    /// use csimlib::trace::{Operation, TraceRecord};
    /// let record = TraceRecord::parse(b" M 0421c7f0,4").unwrap();
    /// assert_eq!(record, TraceRecord::new(Operation::Modify, 0x421c7f0, 4));
    /// ```
    pub fn parse(line: &[u8]) -> Option<Self> {
        let captures = RECORD_PATTERN.captures(line)?;
        let operation = Operation::from_code(*captures.name("op")?.as_bytes().first()?)?;
        // The pattern only matches ASCII, so these conversions can't fail on valid records
        let address = std::str::from_utf8(captures.name("address")?.as_bytes()).ok()?;
        let size = std::str::from_utf8(captures.name("size")?.as_bytes()).ok()?;
        Some(Self {
            operation,
            address: u64::from_str_radix(address, 16).ok()?,
            size: size.parse().ok()?,
        })
    }
}

impl Display for TraceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:x},{}", self.operation.code(), self.address, self.size)
    }
}

/// Streams records out of a trace, one line at a time
///
/// Blank lines are skipped. The first line which isn't a valid record ends the trace, and
/// nothing after it is read; [`TraceReader::stopped_at`] reports where that happened. I/O errors
/// are passed through
pub struct TraceReader<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
    line_number: usize,
    stopped_at: Option<usize>,
    finished: bool,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(64),
            line_number: 0,
            stopped_at: None,
            finished: false,
        }
    }

    /// The 1-based line number of the malformed line which ended the trace, if any
    pub fn stopped_at(&self) -> Option<usize> {
        self.stopped_at
    }

    /// The number of lines read so far, including any malformed line
    pub fn lines_read(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = io::Result<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.buffer.strip_suffix(b"\n").unwrap_or(&self.buffer);
                    if line.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    match TraceRecord::parse(line) {
                        Some(record) => return Some(Ok(record)),
                        None => {
                            self.stopped_at = Some(self.line_number);
                            self.finished = true;
                        }
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

use std::fs::File;
use std::io::{BufRead, BufReader};

// Traces are read line by line, 64KiB covers thousands of records per refill
const BUFFER_SIZE: usize = 64 * 1024;

/// Opens a trace file for sequential reading
///
/// On unix the file is memory mapped, elsewhere (and for empty files, which can't be mapped) a
/// buffered reader is used
pub fn get_reader(file: File) -> Result<Box<dyn BufRead>, String> {
    #[cfg(unix)]
    {
        use std::io::Cursor;
        use memmap2::{Advice, Mmap};
        let len = file.metadata().map_err(|e| format!("Couldn't read the trace file metadata: {e}"))?.len();
        if len > 0 {
            // Safety: the mapping is only read, and traces aren't expected to change while being
            // simulated
            let m = unsafe { Mmap::map(&file) }.map_err(|e| format!("Couldn't memory map the file: {e}"))?;
            m.advise(Advice::Sequential).map_err(|e| format!("Failed to provide access advice to the OS, {e}"))?;
            return Ok(Box::new(Cursor::new(m)));
        }
    }
    Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, file)))
}

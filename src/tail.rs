use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Iterates the lines of a file from last to first.
///
/// Reads fixed-size chunks backwards from the end of the file, so the
/// consumer can stop after any line without the rest of the file being
/// read. The file length is captured when the reader is created; bytes
/// appended afterwards are not seen.
///
/// Yields exactly the lines `BufRead::lines` would yield, in reverse.
pub struct ReverseLines<R> {
    reader: Option<R>,
    /// Bytes not yet pulled into `pending`, counted from the start of the file.
    remaining: u64,
    /// Tail of the unread region: everything after `remaining` that has not
    /// been yielded as a line yet.
    pending: Vec<u8>,
    chunk_size: usize,
    started: bool,
}

impl ReverseLines<File> {
    /// Open `path` for reverse iteration. A missing file yields no lines.
    pub fn open(path: &Path) -> io::Result<Self> {
        match File::open(path) {
            Ok(file) => Self::new(file),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::empty()),
            Err(e) => Err(e),
        }
    }
}

impl<R: Read + Seek> ReverseLines<R> {
    pub fn new(mut reader: R) -> io::Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        Ok(Self {
            reader: Some(reader),
            remaining: len,
            pending: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            started: false,
        })
    }

    fn empty() -> Self {
        Self {
            reader: None,
            remaining: 0,
            pending: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            started: true,
        }
    }

    #[cfg(test)]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Pull the next chunk (towards the start of the file) in front of `pending`.
    fn read_chunk(&mut self) -> io::Result<()> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(());
        };
        let size = (self.chunk_size as u64).min(self.remaining);
        self.remaining -= size;
        reader.seek(SeekFrom::Start(self.remaining))?;

        let mut chunk = vec![0u8; size as usize];
        reader.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&self.pending);
        self.pending = chunk;
        Ok(())
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.reader.is_none() {
            return Ok(None);
        }

        if !self.started {
            self.started = true;
            if self.remaining == 0 {
                self.reader = None;
                return Ok(None);
            }
            self.read_chunk()?;
            // A trailing newline terminates the last line, it does not start a new one.
            if self.pending.last() == Some(&b'\n') {
                self.pending.pop();
            }
        }

        loop {
            if let Some(idx) = self.pending.iter().rposition(|&b| b == b'\n') {
                let line = self.pending.split_off(idx + 1);
                self.pending.truncate(idx);
                return Ok(Some(decode(line)));
            }
            if self.remaining == 0 {
                // Start of file: what is left is the first line.
                self.reader = None;
                let line = std::mem::take(&mut self.pending);
                return Ok(Some(decode(line)));
            }
            self.read_chunk()?;
        }
    }
}

fn decode(mut line: Vec<u8>) -> String {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    match String::from_utf8(line) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

impl<R: Read + Seek> Iterator for ReverseLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => None,
            Err(e) => {
                // Stop after the first I/O error.
                self.reader = None;
                Some(Err(e))
            }
        }
    }
}

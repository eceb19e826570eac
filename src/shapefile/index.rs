/*
This code is part of the shapefile_index library.
License: MIT

Notes: Random-access reader/writer for the .shx record table. Record
lookups are served through a small sliding byte cache so that sequential
scans amortize to one disk read per 64 records.
*/

use crate::shapefile::{ShapefileHeader, HEADER_SIZE_BYTES};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::fs::OpenOptions;
use std::fs::File;
use std::io::prelude::*;
use std::io::{Error, ErrorKind, SeekFrom};

/// Each index record is a 4-byte offset followed by a 4-byte content
/// length, both big-endian and measured in 16-bit words.
const RECORD_SIZE_BYTES: usize = 8;
/// Size of the read-through cache window.
const CACHE_SIZE_BYTES: usize = 512;

/// A reader/writer over a .shx index file.
///
/// Record numbers are 1-based, matching the shapefile record numbering.
/// Offsets and content lengths are taken and returned in bytes; the
/// conversion to the on-disk 16-bit word unit discards the low bit of any
/// odd byte value.
///
/// A `ShapefileIndex` owns its file handle exclusively between `open` and
/// `close`, and may be reopened after closing. It takes no advisory locks,
/// so concurrent readers of the same file are permitted but concurrent
/// writers must be serialized by the caller. A single instance is not safe
/// for unsynchronized use from multiple threads.
///
/// Examples:
///
/// ```no_run
/// use shapefile_index::ShapefileIndex;
///
/// # fn main() -> Result<(), std::io::Error> {
/// let mut shx = ShapefileIndex::new("lakes.shx");
/// shx.open("r")?;
/// for rec in 1..=shx.num_records() {
///     let offset = shx.record_offset(rec)?;
///     let len = shx.record_content_length(rec)?;
///     if len > 0 {
///         // a zero content length marks a deleted record
///         println!("record {} at byte {} ({} bytes)", rec, offset, len);
///     }
/// }
/// shx.close();
/// # Ok(())
/// # }
/// ```
pub struct ShapefileIndex {
    pub file_name: String,
    pub file_mode: String,
    pub header: ShapefileHeader,
    file: Option<File>,
    num_bytes: usize,
    cache: Vec<u8>,
    cache_start: usize,
    cache_end: usize,
}

impl ShapefileIndex {
    /// Creates a closed index referencing `file_name`. The file is not
    /// touched until `open` is called.
    pub fn new(file_name: &str) -> ShapefileIndex {
        ShapefileIndex {
            file_name: file_name.to_string(),
            file_mode: "r".to_string(),
            header: ShapefileHeader::default(),
            file: None,
            num_bytes: 0,
            cache: vec![0u8; CACHE_SIZE_BYTES],
            cache_start: 0,
            cache_end: 0,
        }
    }

    /// Opens the backing file, which must already exist and carry a valid
    /// 100-byte header, and parses that header. `file_mode` is "r" for
    /// read-only access or "rw" for editing. Opening an already-open index
    /// closes it first.
    pub fn open(&mut self, file_mode: &str) -> Result<(), Error> {
        if file_mode != "r" && file_mode != "rw" {
            panic!("Unrecognized file mode '{}'; expected \"r\" or \"rw\".", file_mode);
        }
        self.close();

        let mut f = OpenOptions::new()
            .read(true)
            .write(file_mode == "rw")
            .open(&self.file_name)?;

        let mut buf = [0u8; HEADER_SIZE_BYTES];
        f.read_exact(&mut buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                Error::new(
                    ErrorKind::InvalidData,
                    format!("Malformed shapefile: '{}' is shorter than the 100-byte header.", self.file_name),
                )
            } else {
                e
            }
        })?;
        self.header = ShapefileHeader::from_bytes(&buf)?;
        self.num_bytes = f.metadata()?.len() as usize;
        self.file = Some(f);
        self.file_mode = file_mode.to_string();
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Releases the file handle and discards the cache window. Closing an
    /// already-closed index is a no-op.
    pub fn close(&mut self) {
        self.file = None; // dropping the handle closes it
        self.cache_start = 0;
        self.cache_end = 0;
    }

    /// Returns the number of records in the index, deleted records
    /// included.
    pub fn num_records(&self) -> usize {
        if self.file.is_none() {
            panic!("Attempted to read the index file '{}' while it is closed.", self.file_name);
        }
        (self.num_bytes - HEADER_SIZE_BYTES) / RECORD_SIZE_BYTES
    }

    /// Returns the byte offset into the .shp file of record
    /// `record_number` (1-based).
    pub fn record_offset(&mut self, record_number: usize) -> Result<usize, Error> {
        self.check_record_number(record_number);
        let pos = record_position(record_number);
        Ok(self.read_word_field(pos)? as usize * 2)
    }

    /// Returns the content length in bytes of record `record_number`
    /// (1-based). A deleted record reports a content length of zero while
    /// retaining its stale offset; callers must ignore any record whose
    /// content length is not greater than zero.
    pub fn record_content_length(&mut self, record_number: usize) -> Result<usize, Error> {
        self.check_record_number(record_number);
        let pos = record_position(record_number) + 4;
        Ok(self.read_word_field(pos)? as usize * 2)
    }

    /// Rewrites record `record_number` in place with a new byte offset and
    /// content length.
    pub fn update_record(
        &mut self,
        record_number: usize,
        byte_offset: usize,
        byte_content_length: usize,
    ) -> Result<(), Error> {
        self.check_write_mode();
        self.check_record_number(record_number);
        let pos = record_position(record_number);
        self.write_record_fields(pos, byte_offset, byte_content_length)?;
        self.invalidate_cache_if_overlapping(pos, pos + RECORD_SIZE_BYTES);
        Ok(())
    }

    /// Appends a new record at position `num_records() + 1`.
    pub fn add_record(
        &mut self,
        byte_offset: usize,
        byte_content_length: usize,
    ) -> Result<(), Error> {
        self.check_write_mode();
        let pos = self.num_bytes;
        self.write_record_fields(pos, byte_offset, byte_content_length)?;
        self.num_bytes += RECORD_SIZE_BYTES;
        self.invalidate_cache_if_overlapping(pos, pos + RECORD_SIZE_BYTES);
        Ok(())
    }

    /// Marks record `record_number` deleted by zeroing its content-length
    /// field. The offset field is left untouched and subsequent records do
    /// not shift, so `num_records` is unchanged.
    pub fn delete_record(&mut self, record_number: usize) -> Result<(), Error> {
        self.check_write_mode();
        self.check_record_number(record_number);
        let pos = record_position(record_number) + 4;
        let f = self.stream();
        f.seek(SeekFrom::Start(pos as u64))?;
        f.write_i32::<BigEndian>(0i32)?;
        self.invalidate_cache_if_overlapping(pos, pos + 4);
        Ok(())
    }

    /// Writes the in-memory header back to the file, with `file_length`
    /// recomputed from the current byte length, and syncs to disk. Record
    /// writes are persisted as they are made; only the header is deferred
    /// to flush time.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.check_write_mode();
        self.header.file_length = (self.num_bytes / 2) as i32;
        let bytes = self.header.to_bytes()?;
        let f = self.stream();
        f.seek(SeekFrom::Start(0))?;
        f.write_all(&bytes)?;
        f.sync_all()?;
        self.invalidate_cache_if_overlapping(0, HEADER_SIZE_BYTES);
        Ok(())
    }

    fn stream(&mut self) -> &mut File {
        match self.file.as_mut() {
            Some(f) => f,
            None => panic!("Attempted to access the index file '{}' while it is closed.", self.file_name),
        }
    }

    fn check_write_mode(&self) {
        if self.file.is_none() {
            panic!("Attempted to write to the index file '{}' while it is closed.", self.file_name);
        }
        if self.file_mode != "rw" {
            panic!("The index file '{}' was opened in read-only mode.", self.file_name);
        }
    }

    fn check_record_number(&self, record_number: usize) {
        let count = self.num_records();
        if record_number < 1 || record_number > count {
            panic!(
                "Record number {} is out of range; the index holds {} records.",
                record_number, count
            );
        }
    }

    /// Reads one big-endian 4-byte word-unit field at byte `pos`, serving
    /// it from the cache window and refilling the window on a miss.
    fn read_word_field(&mut self, pos: usize) -> Result<i32, Error> {
        if pos < self.cache_start || pos + 4 > self.cache_end {
            self.fill_cache(pos)?;
        }
        let rel = pos - self.cache_start;
        Ok(BigEndian::read_i32(&self.cache[rel..rel + 4]))
    }

    fn fill_cache(&mut self, pos: usize) -> Result<(), Error> {
        let f = match self.file.as_mut() {
            Some(f) => f,
            None => panic!("Attempted to read the index file while it is closed."),
        };
        f.seek(SeekFrom::Start(pos as u64))?;
        let mut num_read = 0;
        while num_read < CACHE_SIZE_BYTES {
            let n = f.read(&mut self.cache[num_read..])?;
            if n == 0 {
                break; // window extends past the end of the file
            }
            num_read += n;
        }
        self.cache_start = pos;
        self.cache_end = pos + CACHE_SIZE_BYTES;
        Ok(())
    }

    fn write_record_fields(
        &mut self,
        pos: usize,
        byte_offset: usize,
        byte_content_length: usize,
    ) -> Result<(), Error> {
        // the on-disk unit is the 16-bit word; odd byte values lose their
        // low bit here
        let f = self.stream();
        f.seek(SeekFrom::Start(pos as u64))?;
        f.write_i32::<BigEndian>((byte_offset / 2) as i32)?;
        f.write_i32::<BigEndian>((byte_content_length / 2) as i32)?;
        Ok(())
    }

    /// Every mutation funnels through this one rule: the window is
    /// discarded whenever a written byte range intersects it.
    fn invalidate_cache_if_overlapping(&mut self, start: usize, end: usize) {
        if start < self.cache_end && end > self.cache_start {
            self.cache_start = 0;
            self.cache_end = 0;
        }
    }
}

fn record_position(record_number: usize) -> usize {
    HEADER_SIZE_BYTES + (record_number - 1) * RECORD_SIZE_BYTES
}

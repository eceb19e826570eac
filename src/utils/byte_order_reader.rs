/*
This code is part of the shapefile_index library.
License: MIT
*/
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::prelude::*;
use std::io::{Result, SeekFrom};

/// A positioned reader with a switchable byte order. The shapefile header
/// mixes big-endian and little-endian fields within the same 100 bytes, so
/// the byte order can be changed mid-stream.
pub struct ByteOrderReader<R: Read + Seek> {
    is_le: bool,
    reader: R,
    pos: usize,
    len: usize,
}

impl<R: Read + Seek> ByteOrderReader<R> {
    pub fn new(reader: R, byte_order: Endianness) -> ByteOrderReader<R> {
        let is_le = byte_order == Endianness::LittleEndian;
        let mut bor = ByteOrderReader {
            reader: reader,
            is_le: is_le,
            pos: 0usize,
            len: 0, // don't know the length yet
        };
        // now get the length
        let len = bor.reader.seek(SeekFrom::End(0)).unwrap() as usize;
        bor.len = len;
        bor.seek(0); // return the cursor to the start.
        bor
    }

    pub fn set_byte_order(&mut self, byte_order: Endianness) {
        self.is_le = byte_order == Endianness::LittleEndian;
    }

    pub fn seek(&mut self, position: usize) {
        self.pos = position;
        self.reader.seek(SeekFrom::Start(self.pos as u64)).unwrap();
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.pos += 4;
        if self.is_le {
            return self.reader.read_i32::<LittleEndian>();
        }
        self.reader.read_i32::<BigEndian>()
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.pos += 8;
        if self.is_le {
            return self.reader.read_f64::<LittleEndian>();
        }
        self.reader.read_f64::<BigEndian>()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Endianness {
    LittleEndian,
    BigEndian,
}

impl Default for Endianness {
    fn default() -> Endianness {
        Endianness::LittleEndian
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteOrderReader, Endianness};
    use std::io::Cursor;

    #[test]
    fn mixed_endian_reads() {
        // 9994 big-endian followed by 1000 little-endian
        let bytes: Vec<u8> = vec![0x00, 0x00, 0x27, 0x0A, 0xE8, 0x03, 0x00, 0x00];
        let mut bor = ByteOrderReader::new(Cursor::new(bytes), Endianness::BigEndian);
        assert_eq!(bor.read_i32().unwrap(), 9994);
        bor.set_byte_order(Endianness::LittleEndian);
        assert_eq!(bor.read_i32().unwrap(), 1000);
        assert_eq!(bor.pos(), 8);
        assert_eq!(bor.len(), 8);
    }

    #[test]
    fn seek_repositions_reads() {
        let mut bytes = vec![0u8; 12];
        bytes[8..12].copy_from_slice(&42i32.to_be_bytes());
        let mut bor = ByteOrderReader::new(Cursor::new(bytes), Endianness::BigEndian);
        bor.seek(8);
        assert_eq!(bor.read_i32().unwrap(), 42);
    }
}

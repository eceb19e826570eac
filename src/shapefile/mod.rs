/*
This code is part of the shapefile_index library.
License: MIT

Notes: The fixed 100-byte preamble shared by the .shp and .shx files.
*/

pub mod index;

use crate::structures::BoundingBox;
use crate::utils::{ByteOrderReader, ByteOrderWriter, Endianness};
use std::fmt;
use std::io::{Cursor, Error, ErrorKind};

/// Size of the file header shared by the .shp and .shx files, in bytes.
pub const HEADER_SIZE_BYTES: usize = 100;
/// Magic number at byte 0 of every shapefile.
pub const SHAPEFILE_FILE_CODE: i32 = 9994;
/// The only shapefile version ever published.
pub const SHAPEFILE_VERSION: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Null,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
    PointZ,
    PolyLineZ,
    PolygonZ,
    MultiPointZ,
    PointM,
    PolyLineM,
    PolygonM,
    MultiPointM,
    MultiPatch,
}

impl ShapeType {
    /// Maps an on-disk shape-type code onto a ShapeType. The ESRI
    /// enumeration is closed; any unrecognized code maps to Null.
    pub fn from_int(value: i32) -> ShapeType {
        match value {
            0 => ShapeType::Null,
            1 => ShapeType::Point,
            3 => ShapeType::PolyLine,
            5 => ShapeType::Polygon,
            8 => ShapeType::MultiPoint,
            11 => ShapeType::PointZ,
            13 => ShapeType::PolyLineZ,
            15 => ShapeType::PolygonZ,
            18 => ShapeType::MultiPointZ,
            21 => ShapeType::PointM,
            23 => ShapeType::PolyLineM,
            25 => ShapeType::PolygonM,
            28 => ShapeType::MultiPointM,
            31 => ShapeType::MultiPatch,
            _ => ShapeType::Null,
        }
    }

    pub fn to_int(&self) -> i32 {
        match self {
            ShapeType::Null => 0,
            ShapeType::Point => 1,
            ShapeType::PolyLine => 3,
            ShapeType::Polygon => 5,
            ShapeType::MultiPoint => 8,
            ShapeType::PointZ => 11,
            ShapeType::PolyLineZ => 13,
            ShapeType::PolygonZ => 15,
            ShapeType::MultiPointZ => 18,
            ShapeType::PointM => 21,
            ShapeType::PolyLineM => 23,
            ShapeType::PolygonM => 25,
            ShapeType::MultiPointM => 28,
            ShapeType::MultiPatch => 31,
        }
    }
}

impl Default for ShapeType {
    fn default() -> ShapeType {
        ShapeType::Null
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The fixed 100-byte shapefile header. A value type: parsing and
/// serialization are pure functions of a byte slice, with all stream and
/// file-handle management left to `ShapefileIndex`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapefileHeader {
    pub file_code: i32,            // BigEndian; value is 9994
    pub file_length: i32,          // BigEndian; in 16-bit words
    pub version: i32,              // LittleEndian; value is 1000
    pub shape_type: ShapeType,     // LittleEndian
    pub bounding_box: BoundingBox, // LittleEndian doubles
}

impl Default for ShapefileHeader {
    fn default() -> ShapefileHeader {
        ShapefileHeader {
            file_code: SHAPEFILE_FILE_CODE,
            file_length: (HEADER_SIZE_BYTES / 2) as i32,
            version: SHAPEFILE_VERSION,
            shape_type: ShapeType::Null,
            bounding_box: BoundingBox::default(),
        }
    }
}

impl ShapefileHeader {
    pub fn new(shape_type: ShapeType) -> ShapefileHeader {
        ShapefileHeader {
            shape_type: shape_type,
            ..Default::default()
        }
    }

    /// Parses the first 100 bytes of a .shp or .shx file.
    pub fn from_bytes(buf: &[u8]) -> Result<ShapefileHeader, Error> {
        if buf.len() < HEADER_SIZE_BYTES {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "Malformed shapefile header: {} bytes where at least {} are required.",
                    buf.len(),
                    HEADER_SIZE_BYTES
                ),
            ));
        }

        // Note: the shapefile format uses mixed endianness. The file code
        // and file length are big-endian; everything after byte 28 is
        // little-endian.
        let mut bor = ByteOrderReader::new(Cursor::new(buf), Endianness::BigEndian);
        let file_code = bor.read_i32()?;
        bor.seek(24);
        let file_length = bor.read_i32()?;

        bor.set_byte_order(Endianness::LittleEndian);
        let version = bor.read_i32()?;
        let shape_type = ShapeType::from_int(bor.read_i32()?);
        let bounding_box = BoundingBox::from_reader(&mut bor)?;

        Ok(ShapefileHeader {
            file_code: file_code,
            file_length: file_length,
            version: version,
            shape_type: shape_type,
            bounding_box: bounding_box,
        })
    }

    /// Serializes the header to exactly 100 bytes, zero-filling the unused
    /// fields and the Z/M range placeholders.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut bow = ByteOrderWriter::new(
            Cursor::new(Vec::with_capacity(HEADER_SIZE_BYTES)),
            Endianness::BigEndian,
        );

        bow.write_i32(self.file_code)?;

        // unused header bytes
        for _ in 0..5 {
            bow.write_i32(0i32)?;
        }

        bow.write_i32(self.file_length)?;

        bow.set_byte_order(Endianness::LittleEndian);
        bow.write_i32(self.version)?;
        bow.write_i32(self.shape_type.to_int())?;

        self.bounding_box.write(&mut bow, true)?;

        Ok(bow.into_inner().into_inner())
    }
}

impl fmt::Display for ShapefileHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = format!(
            "file_code: {}
file_length: {}
version: {}
shape_type: {}
min_x: {}
min_y: {}
max_x: {}
max_y: {}",
            self.file_code,
            self.file_length,
            self.version,
            self.shape_type,
            self.bounding_box.min_x,
            self.bounding_box.min_y,
            self.bounding_box.max_x,
            self.bounding_box.max_y
        );
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::{ShapeType, ShapefileHeader, HEADER_SIZE_BYTES};
    use crate::structures::BoundingBox;

    #[test]
    fn header_round_trip() {
        let mut header = ShapefileHeader::new(ShapeType::Polygon);
        header.file_length = 1024;
        header.bounding_box = BoundingBox::new(-113.5, -112.25, 48.0, 49.75);

        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE_BYTES);

        let parsed = ShapefileHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn truncated_header_is_rejected() {
        let err = ShapefileHeader::from_bytes(&[0u8; 50]).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn shape_type_code_table_round_trip() {
        for code in [0, 1, 3, 5, 8, 11, 13, 15, 18, 21, 23, 25, 28, 31] {
            assert_eq!(ShapeType::from_int(code).to_int(), code);
        }
    }

    #[test]
    fn unrecognized_shape_type_collapses_to_null() {
        assert_eq!(ShapeType::from_int(99), ShapeType::Null);
        assert_eq!(ShapeType::from_int(-1), ShapeType::Null);
        assert_eq!(ShapeType::from_int(2), ShapeType::Null);

        // a raw header carrying an unknown code parses as Null and
        // rewrites as code 0
        let mut bytes = ShapefileHeader::new(ShapeType::Point).to_bytes().unwrap();
        bytes[32..36].copy_from_slice(&99i32.to_le_bytes());
        let parsed = ShapefileHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.shape_type, ShapeType::Null);
        let rewritten = parsed.to_bytes().unwrap();
        assert_eq!(&rewritten[32..36], &0i32.to_le_bytes());
    }

    #[test]
    fn default_header_constants() {
        let header = ShapefileHeader::default();
        assert_eq!(header.file_code, 9994);
        assert_eq!(header.version, 1000);
        assert_eq!(header.shape_type, ShapeType::Null);
        assert!(header.bounding_box.is_unset());
    }

    #[test]
    fn display_lists_all_fields() {
        let header = ShapefileHeader::new(ShapeType::PolyLine);
        let s = format!("{}", header);
        assert!(s.contains("file_code: 9994"));
        assert!(s.contains("shape_type: PolyLine"));
    }
}

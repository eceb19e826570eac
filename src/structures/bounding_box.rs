/*
This code is part of the shapefile_index library.
License: MIT
*/
use crate::structures::Point2D;
use crate::utils::{ByteOrderReader, ByteOrderWriter, Endianness};
use std::io::{Error, Read, Seek, Write};

/// Byte offset of the bounding box within a shapefile file header.
const HEADER_BOUNDING_BOX_OFFSET: usize = 36;

/// A 2-D extent. An all-zero box is the "unset" value; `expand_to` replaces
/// it wholesale rather than folding the zeros into the minima and maxima.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> BoundingBox {
        let (x1, x2) = if min_x < max_x {
            (min_x, max_x)
        } else {
            (max_x, min_x)
        };
        let (y1, y2) = if min_y < max_y {
            (min_y, max_y)
        } else {
            (max_y, min_y)
        };
        BoundingBox {
            min_x: x1,
            min_y: y1,
            max_x: x2,
            max_y: y2,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.min_x == 0f64 && self.min_y == 0f64 && self.max_x == 0f64 && self.max_y == 0f64
    }

    pub fn get_width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn get_height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn overlaps(&self, other: BoundingBox) -> bool {
        if self.max_y < other.min_y
            || self.max_x < other.min_x
            || self.min_y > other.max_y
            || self.min_x > other.max_x
        {
            return false;
        }
        true
    }

    pub fn is_point_in_box(&self, x: f64, y: f64) -> bool {
        !(self.max_y < y || self.max_x < x || self.min_y > y || self.min_x > x)
    }

    /// Expands this box to include `other`. An unset (all-zero) box is
    /// replaced by `other` entirely.
    pub fn expand_to(&mut self, other: BoundingBox) {
        if self.is_unset() {
            *self = other;
            return;
        }
        self.max_y = if self.max_y >= other.max_y {
            self.max_y
        } else {
            other.max_y
        };
        self.max_x = if self.max_x >= other.max_x {
            self.max_x
        } else {
            other.max_x
        };
        self.min_y = if self.min_y <= other.min_y {
            self.min_y
        } else {
            other.min_y
        };
        self.min_x = if self.min_x <= other.min_x {
            self.min_x
        } else {
            other.min_x
        };
    }

    /// Reads the bounding box from a file header: four little-endian doubles
    /// in (min_x, min_y, max_x, max_y) order starting at byte 36.
    pub fn from_reader<R: Read + Seek>(
        reader: &mut ByteOrderReader<R>,
    ) -> Result<BoundingBox, Error> {
        reader.seek(HEADER_BOUNDING_BOX_OFFSET);
        reader.set_byte_order(Endianness::LittleEndian);
        Ok(BoundingBox {
            min_x: reader.read_f64()?,
            min_y: reader.read_f64()?,
            max_x: reader.read_f64()?,
            max_y: reader.read_f64()?,
        })
    }

    /// Writes the bounding box as four little-endian doubles. When
    /// `include_zm_placeholder` is set, four zeroed doubles follow for the
    /// Z-range and M-range slots of a file header; this library does not
    /// carry Z or M ranges.
    pub fn write<W: Write>(
        &self,
        writer: &mut ByteOrderWriter<W>,
        include_zm_placeholder: bool,
    ) -> Result<(), Error> {
        // the doubles are little-endian even where the surrounding header
        // fields are big-endian
        writer.set_byte_order(Endianness::LittleEndian);
        writer.write_f64(self.min_x)?;
        writer.write_f64(self.min_y)?;
        writer.write_f64(self.max_x)?;
        writer.write_f64(self.max_y)?;
        if include_zm_placeholder {
            for _ in 0..4 {
                writer.write_f64(0f64)?;
            }
        }
        Ok(())
    }

    /// Returns the (upper-left, lower-right) corners, i.e.
    /// (min_x, max_y)-(max_x, min_y). Note the corner convention: this is
    /// not (min, min)-(max, max).
    pub fn to_rectangle(&self) -> (Point2D, Point2D) {
        (
            Point2D::new(self.min_x, self.max_y),
            Point2D::new(self.max_x, self.min_y),
        )
    }
}

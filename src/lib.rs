/*
This code is part of the shapefile_index library.
License: MIT

Notes: Reading and writing of the ESRI Shapefile file header and the
companion .shx index file. This library does not read .shp geometry or
.dbf attribute data.
*/

// private sub-modules defined in other files
pub mod shapefile;
pub mod structures;
pub mod utils;

// exports identifiers from sub-modules in the crate namespace
pub use crate::shapefile::index::ShapefileIndex;
pub use crate::shapefile::{ShapeType, ShapefileHeader};
pub use crate::structures::{BoundingBox, Point2D};

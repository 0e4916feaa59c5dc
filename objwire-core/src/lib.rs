/// objwire Core Library - OBJ mesh parsing and wireframe rasterization
///
/// This library reads the vertex/face subset of Wavefront OBJ into an indexed
/// geometry store and draws mesh edges into a pixel buffer with Bresenham's
/// integer line algorithm.

pub mod buffer;
pub mod error;
pub mod geometry;
pub mod obj;
pub mod raster;
pub mod wireframe;

// Re-export commonly used types
pub use buffer::PixelBuffer;
pub use error::{Error, Result};
pub use geometry::{Bounds, EntityCounts, Face, GeometryStore};
pub use obj::{ObjParser, ParseOutcome, ParseReport};
pub use raster::{draw_line, LinePixels, SENTINEL};
pub use wireframe::{draw_wireframe, WireframeStats};

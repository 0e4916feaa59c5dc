/// Edge drawing for every face of a parsed mesh
use nalgebra::Point3;

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::geometry::{Bounds, Face, GeometryStore};
use crate::raster::draw_line_with;

/// Maps model-space x/y onto pixel cells so that the bounds fill the buffer
#[derive(Debug, Clone, Copy)]
pub struct ScreenMapping {
    bounds: Bounds,
    max_x: f32,
    max_y: f32,
}

impl ScreenMapping {
    pub fn fit(bounds: &Bounds, width: usize, height: usize) -> Self {
        Self {
            bounds: *bounds,
            max_x: width.saturating_sub(1) as f32,
            max_y: height.saturating_sub(1) as f32,
        }
    }

    /// Pixel cell for a vertex; +y points up, z is dropped
    pub fn map(&self, vertex: &Point3<f32>) -> (i64, i64) {
        let extent = self.bounds.extent();
        let nx = normalize(vertex.x, self.bounds.min.x, extent.x);
        let ny = normalize(vertex.y, self.bounds.min.y, extent.y);

        let x = (nx * self.max_x).round().clamp(0.0, self.max_x);
        let y = ((1.0 - ny) * self.max_y).round().clamp(0.0, self.max_y);
        (x as i64, y as i64)
    }
}

fn normalize(value: f32, min: f32, extent: f32) -> f32 {
    if extent > 0.0 {
        (value - min) / extent
    } else {
        0.5
    }
}

/// Totals for one wireframe pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WireframeStats {
    pub faces: usize,
    pub edges: usize,
    pub pixels: usize,
}

/// Draw the three edges of every face in `color`.
///
/// Every face index is resolved before the first edge is drawn; a face naming
/// a vertex that does not exist fails with [`Error::FaceIndex`] (face numbers
/// are 1-based) and leaves the buffer untouched.
pub fn draw_wireframe(
    store: &GeometryStore,
    buffer: &mut PixelBuffer,
    color: &[u32],
) -> Result<WireframeStats> {
    let Some(bounds) = store.bounds() else {
        return match store.faces().first() {
            Some(face) => Err(Error::FaceIndex {
                face: 1,
                index: face.indices[0],
                vertices: 0,
            }),
            None => Ok(WireframeStats::default()),
        };
    };

    tracing::debug!(
        faces = store.faces().len(),
        width = buffer.width(),
        height = buffer.height(),
        "drawing wireframe"
    );

    let mapping = ScreenMapping::fit(&bounds, buffer.width(), buffer.height());
    let triangles = (1..)
        .zip(store.faces())
        .map(|(number, face)| resolve(store, number, face).map(|vs| vs.map(|v| mapping.map(v))))
        .collect::<Result<Vec<_>>>()?;

    let mut stats = WireframeStats::default();
    for corners in triangles {
        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            stats.pixels += draw_line_with(buffer, corners[a], corners[b], color)?;
            stats.edges += 1;
        }
        stats.faces += 1;
    }

    Ok(stats)
}

fn resolve<'a>(
    store: &'a GeometryStore,
    number: usize,
    face: &Face,
) -> Result<[&'a Point3<f32>; 3]> {
    let lookup = |index: u32| {
        store.vertex(index).ok_or_else(|| Error::FaceIndex {
            face: number,
            index,
            vertices: store.vertices().len(),
        })
    };
    let [a, b, c] = face.indices;
    Ok([lookup(a)?, lookup(b)?, lookup(c)?])
}

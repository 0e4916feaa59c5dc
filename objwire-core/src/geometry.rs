/// Geometry primitives and the indexed store filled by the OBJ parser
use std::path::{Path, PathBuf};

use nalgebra::{Point2, Point3, Vector3};

/// A triangle face referencing three vertices by 1-based position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub indices: [u32; 3],
    /// Number of corners; always `VERTEX_COUNT` until polygon faces exist
    pub count: usize,
}

impl Face {
    pub const VERTEX_COUNT: usize = 3;

    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self {
            indices: [a, b, c],
            count: Self::VERTEX_COUNT,
        }
    }
}

/// Number of entities of each kind held by a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub vertices: usize,
    pub texcoords: usize,
    pub normals: usize,
    pub faces: usize,
}

/// Axis-aligned bounding box of a vertex set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Owned, append-only collections of mesh entities
#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    vertices: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    texcoords: Vec<Point2<f32>>,
    faces: Vec<Face>,
    path: Option<PathBuf>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn push_vertex(&mut self, vertex: Point3<f32>) {
        self.vertices.push(vertex);
    }

    pub fn push_normal(&mut self, normal: Vector3<f32>) {
        self.normals.push(normal);
    }

    pub fn push_texcoord(&mut self, texcoord: Point2<f32>) {
        self.texcoords.push(texcoord);
    }

    pub fn push_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn texcoords(&self) -> &[Point2<f32>] {
        &self.texcoords
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Path of the file this store was read from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Resolve a 1-based vertex index
    pub fn vertex(&self, index: u32) -> Option<&Point3<f32>> {
        let position = usize::try_from(index).ok()?.checked_sub(1)?;
        self.vertices.get(position)
    }

    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            vertices: self.vertices.len(),
            texcoords: self.texcoords.len(),
            normals: self.normals.len(),
            faces: self.faces.len(),
        }
    }

    /// Bounding box of all vertices, `None` for an empty store
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.vertices.first()?;
        let bounds = self.vertices.iter().skip(1).fold(
            Bounds {
                min: first,
                max: first,
            },
            |bounds, v| Bounds {
                min: bounds.min.inf(v),
                max: bounds.max.sup(v),
            },
        );
        Some(bounds)
    }

    /// Create a simple indexed cube for testing
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut store = Self::new();

        for (x, y, z) in [
            (-half, -half, half),
            (half, -half, half),
            (half, half, half),
            (-half, half, half),
            (-half, -half, -half),
            (half, -half, -half),
            (half, half, -half),
            (-half, half, -half),
        ] {
            store.push_vertex(Point3::new(x, y, z));
        }

        for [a, b, c] in [
            // Front
            [1, 2, 3],
            [1, 3, 4],
            // Back
            [5, 8, 7],
            [5, 7, 6],
            // Top
            [8, 4, 3],
            [8, 3, 7],
            // Bottom
            [5, 6, 2],
            [5, 2, 1],
            // Right
            [6, 7, 3],
            [6, 3, 2],
            // Left
            [5, 1, 4],
            [5, 4, 8],
        ] {
            store.push_face(Face::new(a, b, c));
        }

        store
    }
}

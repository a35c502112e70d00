/// Scene data: indexed triangles over homogeneous model-space vertices
use crate::colour::Colour;
use crate::error::{Error, Result};
use crate::vector::{Vec3, Vec4};

/// A triangle face given by three indices into its model's vertex array.
///
/// Front faces run counter-clockwise as seen from outside the solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertex: [usize; 3],
    pub filled: bool,
    pub colour: Colour,
}

impl Triangle {
    pub fn new(vertex: [usize; 3], filled: bool, colour: Colour) -> Self {
        Self {
            vertex,
            filled,
            colour,
        }
    }

    pub fn filled(vertex: [usize; 3], colour: Colour) -> Self {
        Self::new(vertex, true, colour)
    }

    pub fn wireframe(vertex: [usize; 3], colour: Colour) -> Self {
        Self::new(vertex, false, colour)
    }
}

/// Calculate the (unnormalized) face normal `(v1 - v0) × (v2 - v0)`
pub fn face_normal(v0: &Vec3<f32>, v1: &Vec3<f32>, v2: &Vec3<f32>) -> Vec3<f32> {
    let edge1 = *v1 - *v0;
    let edge2 = *v2 - *v0;
    edge1.cross(&edge2)
}

/// Immutable model: vertex positions plus the triangles indexing them
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    vertices: Vec<Vec4<f32>>,
    triangles: Vec<Triangle>,
}

impl Model {
    /// Build a model, checking every triangle index against the vertex count
    pub fn new(vertices: Vec<Vec4<f32>>, triangles: Vec<Triangle>) -> Result<Self> {
        for (t, triangle) in triangles.iter().enumerate() {
            if let Some(&index) = triangle.vertex.iter().find(|&&i| i >= vertices.len()) {
                return Err(Error::InvalidTriangle {
                    triangle: t,
                    index,
                    vertices: vertices.len(),
                });
            }
        }
        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// Points given as 3D positions (w = 1)
    pub fn from_points(points: &[[f32; 3]], triangles: Vec<Triangle>) -> Result<Self> {
        Self::new(homogeneous(points), triangles)
    }

    pub fn vertices(&self) -> &[Vec4<f32>] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Same geometry, every triangle drawn as a wireframe
    pub fn into_wireframe(mut self) -> Self {
        for triangle in &mut self.triangles {
            triangle.filled = false;
        }
        self
    }

    /// Axis-aligned cube centred at the origin, one palette colour per face
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let points = [
            [-h, -h, -h],
            [h, -h, -h],
            [h, h, -h],
            [-h, h, -h],
            [-h, -h, h],
            [h, -h, h],
            [h, h, h],
            [-h, h, h],
        ];
        let faces = [
            ([4, 5, 6, 7], Colour::RED),    // +z
            ([1, 0, 3, 2], Colour::ORANGE), // -z
            ([5, 1, 2, 6], Colour::BLUE),   // +x
            ([0, 4, 7, 3], Colour::GREEN),  // -x
            ([7, 6, 2, 3], Colour::WHITE),  // +y
            ([0, 1, 5, 4], Colour::YELLOW), // -y
        ];
        let triangles = faces
            .iter()
            .flat_map(|&([a, b, c, d], colour)| {
                [
                    Triangle::filled([a, b, c], colour),
                    Triangle::filled([a, c, d], colour),
                ]
            })
            .collect();
        Self {
            vertices: homogeneous(&points),
            triangles,
        }
    }

    /// Triangular prism with its caps at `z = ±0.1`, drawn as wireframe
    pub fn triangular_prism(colour: Colour) -> Self {
        let points = [
            [-0.5, -0.5, -0.1],
            [0.0, 0.8, -0.1],
            [0.5, -0.5, -0.1],
            [-0.5, -0.5, 0.1],
            [0.0, 0.8, 0.1],
            [0.5, -0.5, 0.1],
        ];
        let faces: [[usize; 3]; 8] = [
            [3, 5, 4],
            [0, 1, 2],
            [0, 2, 5],
            [0, 5, 3],
            [0, 3, 4],
            [0, 4, 1],
            [2, 1, 4],
            [2, 4, 5],
        ];
        let triangles = faces
            .iter()
            .map(|&f| Triangle::wireframe(f, colour))
            .collect();
        Self {
            vertices: homogeneous(&points),
            triangles,
        }
    }
}

fn homogeneous(points: &[[f32; 3]]) -> Vec<Vec4<f32>> {
    points.iter().map(|&p| Vec3::new(p).promote(1.0)).collect()
}

/// SWGL Core Library - CPU software rendering pipeline
///
/// This library provides the stateless math kernel (vectors, matrices,
/// quaternions, transform factories), a depth-buffered rasterizer, the
/// arcball rotation controller, and the [`Viewer`] that ties a [`Scene`] to
/// pointer and frame-tick events. Presenting the frame is left to the caller.
pub mod arcball;
pub mod colour;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod matrix;
pub mod projection;
pub mod quaternion;
pub mod raster;
pub mod renderer;
pub mod scalar;
pub mod scene;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use arcball::Arcball;
pub use colour::Colour;
pub use config::{AxisAngle, RendererConfig};
pub use error::{Error, Result};
pub use framebuffer::{Frame, FrameBuffer};
pub use geometry::{Model, Triangle};
pub use matrix::{Mat2, Mat3, Mat4, Matrix};
pub use projection::Projection;
pub use quaternion::Quaternion;
pub use raster::FillMode;
pub use renderer::{FrameStats, Renderer};
pub use scalar::Real;
pub use scene::{Scene, Viewer};
pub use transform::Transform;
pub use vector::{Vec2, Vec3, Vec4, Vector};

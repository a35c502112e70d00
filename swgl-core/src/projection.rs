/// Projection setups selectable from configuration
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matrix::Mat4;
use crate::transform::Transform;

/// Projection mode for rendering, with its bounds.
///
/// All variants use the OpenGL eye-space convention: the camera looks down
/// −z, `near`/`far` are distances along that axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    /// Perspective viewing frustum given by its near-plane rectangle
    Frustum {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    /// Perspective from a vertical field of view in radians
    Perspective {
        fovy: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    /// Symmetric orthographic box of half-extent `half`
    pub fn orthographic(half: f32, near: f32, far: f32) -> Self {
        Self::Orthographic {
            left: -half,
            right: half,
            bottom: -half,
            top: half,
            near,
            far,
        }
    }

    /// Build the projection matrix, failing on degenerate bounds
    pub fn matrix(&self) -> Result<Mat4<f32>> {
        match *self {
            Self::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Transform::orthographic(left, right, bottom, top, near, far),
            Self::Frustum {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Transform::frustum(left, right, bottom, top, near, far),
            Self::Perspective {
                fovy,
                aspect,
                near,
                far,
            } => Transform::perspective(fovy, aspect, near, far),
        }
    }

    pub fn is_perspective(&self) -> bool {
        !matches!(self, Self::Orthographic { .. })
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::orthographic(1.5, 0.0, 200.0)
    }
}

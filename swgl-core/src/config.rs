/// Renderer configuration.
///
/// Loads viewport, projection and shading settings from JSON strings (file IO
/// left to the front end). Every field has a default, so `{}` is a valid
/// configuration: a 600×600 orthographic view of a unit-sized scene placed
/// 100 units in front of the camera.
use serde::{Deserialize, Serialize};

use crate::colour::Colour;
use crate::error::{Error, Result};
use crate::projection::Projection;
use crate::quaternion::Quaternion;
use crate::raster::FillMode;
use crate::vector::Vec3;

/// Rotation given as an axis (any non-zero length) and an angle in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAngle {
    pub axis: [f32; 3],
    pub angle: f32,
}

impl AxisAngle {
    pub fn new(axis: [f32; 3], angle: f32) -> Self {
        Self { axis, angle }
    }

    pub fn quaternion(&self) -> Result<Quaternion<f32>> {
        Quaternion::from_axis_angle(&Vec3::new(self.axis), self.angle)
            .map_err(|_| Error::Config("orientation axis must be non-zero".to_string()))
    }
}

impl Default for AxisAngle {
    fn default() -> Self {
        Self::new([0.0, 0.0, 1.0], 0.0)
    }
}

/// Everything needed to build a [`Renderer`](crate::renderer::Renderer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    pub background: Colour,
    pub projection: Projection,
    /// The scene is translated by `-camera_distance` along z before projection
    pub camera_distance: f32,
    /// Direction towards the light in eye space
    pub light_direction: [f32; 3],
    pub fill_mode: FillMode,
    /// Skip triangles facing away from the light and shade the rest
    pub lighting: bool,
    /// Orientation before any pointer input
    pub initial_orientation: AxisAngle,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            background: Colour::BLACK,
            projection: Projection::default(),
            camera_distance: 100.0,
            light_direction: [0.0, 0.0, 1.0],
            fill_mode: FillMode::default(),
            lighting: true,
            initial_orientation: AxisAngle::default(),
        }
    }
}

impl RendererConfig {
    /// Parses and validates config from JSON.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check everything a renderer would otherwise fail on at construction
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        self.projection.matrix()?;
        if !self.camera_distance.is_finite() {
            return Err(Error::Config("camera_distance must be finite".to_string()));
        }
        self.light()?;
        self.initial_orientation.quaternion()?;
        Ok(())
    }

    /// Unit light direction
    pub fn light(&self) -> Result<Vec3<f32>> {
        Vec3::new(self.light_direction)
            .unit()
            .map_err(|_| Error::Config("light_direction must be non-zero".to_string()))
    }
}

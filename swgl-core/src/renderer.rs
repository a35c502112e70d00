/// Per-frame pipeline: model matrix, shading, projection, perspective divide,
/// viewport and rasterization
use tracing::{debug, warn};

use crate::colour::Colour;
use crate::config::RendererConfig;
use crate::error::Result;
use crate::framebuffer::FrameBuffer;
use crate::geometry::{face_normal, Model};
use crate::matrix::Mat4;
use crate::projection::Projection;
use crate::raster::{self, FillMode};
use crate::transform::Transform;
use crate::vector::{Vec3, Vec4};

/// What happened to the triangles submitted since the last clear
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Rasterized
    pub drawn: usize,
    /// Facing away from the light
    pub culled: usize,
    /// Degenerate, not projectable, or rejected by the fill (clockwise on
    /// screen for the barycentric filler)
    pub skipped: usize,
}

/// Owns the frame buffer and the fixed part of the transform chain.
///
/// `draw_model` takes model-space geometry through
/// `viewport · divide(projection · view · model)`, where `view` pushes the
/// scene `camera_distance` units down −z.
///
/// Shading uses `L = n · light` with the face normal in eye space. With
/// lighting on, triangles with `L <= 0` are skipped. For a closed convex
/// solid lit from the camera this hides exactly the back faces; it is not
/// general back-face culling.
#[derive(Debug, Clone)]
pub struct Renderer {
    fb: FrameBuffer,
    projection: Mat4<f32>,
    view: Mat4<f32>,
    viewport: Mat4<f32>,
    light: Vec3<f32>,
    lighting: bool,
    fill_mode: FillMode,
    stats: FrameStats,
}

impl Renderer {
    pub fn new(config: &RendererConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fb: FrameBuffer::new(config.width, config.height, config.background)?,
            projection: config.projection.matrix()?,
            view: Transform::translation4(0.0, 0.0, -config.camera_distance),
            viewport: Transform::viewport(config.width, config.height)?,
            light: config.light()?,
            lighting: config.lighting,
            fill_mode: config.fill_mode,
            stats: FrameStats::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.fb.width()
    }

    pub fn height(&self) -> u32 {
        self.fb.height()
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn set_projection(&mut self, projection: &Projection) -> Result<()> {
        self.projection = projection.matrix()?;
        Ok(())
    }

    /// Reallocate the buffers for a `width × height` viewport
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let viewport = Transform::viewport(width, height)?;
        self.fb = FrameBuffer::new(width, height, self.fb.background())?;
        self.viewport = viewport;
        Ok(())
    }

    pub fn set_fill_mode(&mut self, mode: FillMode) {
        self.fill_mode = mode;
    }

    pub fn set_lighting(&mut self, lighting: bool) {
        self.lighting = lighting;
    }

    pub fn set_light_direction(&mut self, direction: &Vec3<f32>) -> Result<()> {
        self.light = direction.unit()?;
        Ok(())
    }

    /// Tag subsequent pixels for picking
    pub fn set_draw_id(&mut self, id: u32) {
        self.fb.set_draw_id(id);
    }

    /// Clear the buffers and start counting a new frame
    pub fn begin_frame(&mut self) {
        self.fb.clear();
        self.fb.set_draw_id(crate::framebuffer::NO_ID);
        self.stats = FrameStats::default();
    }

    /// Statistics of the frame so far
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn end_frame(&mut self) -> FrameStats {
        let stats = self.stats;
        debug!(
            drawn = stats.drawn,
            culled = stats.culled,
            skipped = stats.skipped,
            "frame rendered"
        );
        stats
    }

    /// Draw every triangle of `model` placed by `model_matrix`
    pub fn draw_model(&mut self, model: &Model, model_matrix: &Mat4<f32>) {
        let model_view = self.view * *model_matrix;
        let eye: Vec<Vec4<f32>> = model
            .vertices()
            .iter()
            .map(|v| model_view * *v)
            .collect();

        for (index, triangle) in model.triangles().iter().enumerate() {
            let [a, b, c] = triangle.vertex.map(|i| eye[i]);

            let colour = if self.lighting {
                let normal = face_normal(&a.demote(), &b.demote(), &c.demote());
                let Ok(normal) = normal.unit() else {
                    debug!(triangle = index, "zero-area triangle skipped");
                    self.stats.skipped += 1;
                    continue;
                };
                let luminance = normal.dot(&self.light);
                if luminance <= 0.0 {
                    self.stats.culled += 1;
                    continue;
                }
                triangle.colour.adjust_brightness(luminance)
            } else {
                triangle.colour
            };

            let raster = match self.to_raster(&[a, b, c]) {
                Ok(raster) => raster,
                Err(error) => {
                    warn!(triangle = index, %error, "triangle skipped");
                    self.stats.skipped += 1;
                    continue;
                }
            };

            self.draw_triangle(&raster, colour, triangle.filled);
        }
    }

    /// Raster-space triangle, no transform applied
    pub fn draw_triangle(&mut self, v: &[Vec3<f32>; 3], colour: Colour, filled: bool) {
        let accepted = if filled {
            raster::draw_triangle(&mut self.fb, v, colour, self.fill_mode)
        } else {
            raster::draw_wireframe_triangle(&mut self.fb, v, colour);
            true
        };
        if accepted {
            self.stats.drawn += 1;
        } else {
            self.stats.skipped += 1;
        }
    }

    /// Raster-space line, no transform applied
    pub fn draw_line(&mut self, a: &Vec3<f32>, b: &Vec3<f32>, colour: Colour) {
        raster::draw_line(&mut self.fb, a, b, colour);
    }

    /// Raster position and viewport depth of a model-space point
    pub fn project_vertex(&self, model_matrix: &Mat4<f32>, v: &Vec4<f32>) -> Result<Vec3<f32>> {
        let eye = self.view * *model_matrix * *v;
        self.eye_to_raster(&eye)
    }

    /// Model-space point under raster pixel `(x, y)`, using the depth stored
    /// there; `None` when nothing was drawn at that pixel.
    pub fn unproject(&self, model_matrix: &Mat4<f32>, x: i32, y: i32) -> Result<Option<Vec3<f32>>> {
        let Some(z) = self.fb.depth_at(x, y) else {
            return Ok(None);
        };
        let mvp = Transform::mvp_matrix(model_matrix, &self.view, &self.projection);
        let inverse = (self.viewport * mvp).inverse()?;
        let raster = Vec4::new([x as f32 + 0.5, y as f32 + 0.5, z, 1.0]);
        let point = (inverse * raster).perspective_divide()?;
        Ok(Some(point.demote()))
    }

    fn to_raster(&self, eye: &[Vec4<f32>; 3]) -> Result<[Vec3<f32>; 3]> {
        Ok([
            self.eye_to_raster(&eye[0])?,
            self.eye_to_raster(&eye[1])?,
            self.eye_to_raster(&eye[2])?,
        ])
    }

    fn eye_to_raster(&self, eye: &Vec4<f32>) -> Result<Vec3<f32>> {
        let ndc = (self.projection * *eye).perspective_divide()?;
        Ok((self.viewport * ndc).demote())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RendererConfig;
    use crate::error::Error;
    use crate::geometry::Triangle;

    fn small_config() -> RendererConfig {
        RendererConfig {
            width: 120,
            height: 120,
            ..RendererConfig::default()
        }
    }

    #[test]
    fn test_cube_shows_only_front_face_head_on() {
        let mut renderer = Renderer::new(&small_config()).unwrap();
        renderer.begin_frame();
        renderer.draw_model(&Model::cube(1.0), &Transform::identity());
        let stats = renderer.end_frame();
        // the four side faces are edge-on (L = 0) and the back faces away
        assert_eq!(stats.drawn, 2);
        assert_eq!(stats.culled, 10);
        let centre = renderer.frame_buffer().pixel_at(60, 60);
        assert_eq!(centre, Some(Colour::RED.argb()));
    }

    #[test]
    fn test_lighting_off_draws_everything() {
        let mut renderer = Renderer::new(&small_config()).unwrap();
        renderer.set_lighting(false);
        renderer.set_fill_mode(FillMode::Scanline);
        renderer.begin_frame();
        renderer.draw_model(&Model::cube(1.0), &Transform::rotation_y4(0.3));
        let stats = renderer.end_frame();
        // top and bottom are edge-on under an orthographic view
        assert_eq!((stats.drawn, stats.culled, stats.skipped), (8, 0, 4));
    }

    #[test]
    fn test_clockwise_fill_counts_as_skipped() {
        let mut renderer = Renderer::new(&small_config()).unwrap();
        renderer.set_lighting(false);
        renderer.begin_frame();
        renderer.draw_model(&Model::cube(1.0), &Transform::rotation_y4(0.3));
        let stats = renderer.end_frame();
        // front and one side run counter-clockwise; the rest are wound away
        // or edge-on
        assert_eq!((stats.drawn, stats.skipped), (4, 8));

        let [a, b, c] = [
            Vec3::new([10.0, 10.0, 5.0]),
            Vec3::new([10.0, 50.0, 5.0]),
            Vec3::new([50.0, 10.0, 5.0]),
        ];
        renderer.begin_frame();
        renderer.draw_triangle(&[a, c, b], Colour::RED, true);
        renderer.draw_triangle(&[a, c, b], Colour::RED, false);
        renderer.draw_triangle(&[a, b, c], Colour::RED, true);
        let stats = renderer.end_frame();
        assert_eq!((stats.drawn, stats.skipped), (2, 1));
    }

    #[test]
    fn test_depth_sorting_across_models() {
        let mut renderer = Renderer::new(&small_config()).unwrap();
        let square = |colour| {
            Model::from_points(
                &[
                    [-0.5, -0.5, 0.0],
                    [0.5, -0.5, 0.0],
                    [0.5, 0.5, 0.0],
                    [-0.5, 0.5, 0.0],
                ],
                vec![
                    Triangle::filled([0, 1, 2], colour),
                    Triangle::filled([0, 2, 3], colour),
                ],
            )
            .unwrap()
        };
        renderer.begin_frame();
        renderer.draw_model(&square(Colour::GREEN), &Transform::translation4(0.0, 0.0, 1.0));
        renderer.draw_model(&square(Colour::BLUE), &Transform::identity());
        assert_eq!(renderer.frame_buffer().pixel_at(60, 60), Some(Colour::GREEN.argb()));
    }

    #[test]
    fn test_project_and_unproject() {
        let mut renderer = Renderer::new(&small_config()).unwrap();
        let model = Transform::identity();
        let corner = renderer
            .project_vertex(&model, &Vec4::new([0.5, 0.5, 0.5, 1.0]))
            .unwrap();
        // ortho half-extent 1.5 over 120 pixels: 0.5 maps 20 pixels off centre
        assert!((corner.x() - 80.0).abs() < 1e-3);
        assert!((corner.y() - 40.0).abs() < 1e-3);

        renderer.begin_frame();
        assert_eq!(renderer.unproject(&model, 60, 60).unwrap(), None);
        renderer.draw_model(&Model::cube(1.0), &model);
        let hit = renderer.unproject(&model, 60, 60).unwrap().unwrap();
        assert!((hit.z() - 0.5).abs() < 1e-2, "{hit}");
        assert!(hit.x().abs() < 0.02 && hit.y().abs() < 0.02, "{hit}");
    }

    #[test]
    fn test_draw_ids_tag_pixels() {
        let mut renderer = Renderer::new(&small_config()).unwrap();
        renderer.begin_frame();
        renderer.set_draw_id(3);
        renderer.draw_model(&Model::cube(1.0), &Transform::identity());
        assert_eq!(renderer.frame_buffer().id_at(60, 60), Some(3));
        assert_eq!(renderer.frame_buffer().id_at(2, 2), None);
    }

    #[test]
    fn test_unprojectable_vertex_is_skipped() {
        let config = RendererConfig {
            projection: Projection::Frustum {
                left: -0.2,
                right: 0.2,
                bottom: -0.2,
                top: 0.2,
                near: 0.1,
                far: 140.0,
            },
            camera_distance: 0.0,
            lighting: false,
            ..small_config()
        };
        let mut renderer = Renderer::new(&config).unwrap();
        // a vertex at the eye has w = 0 after projection
        let model = Model::from_points(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, -5.0], [0.0, 1.0, -5.0]],
            vec![Triangle::filled([0, 1, 2], Colour::RED)],
        )
        .unwrap();
        renderer.begin_frame();
        renderer.draw_model(&model, &Transform::identity());
        assert_eq!(renderer.end_frame().skipped, 1);
        assert_eq!(
            renderer.project_vertex(&Transform::identity(), &Vec4::new([0.0, 0.0, 0.0, 1.0])),
            Err(Error::DivisionByZero)
        );
    }

    #[test]
    fn test_resize_and_reproject() {
        let mut renderer = Renderer::new(&small_config()).unwrap();
        renderer.resize(200, 100).unwrap();
        assert_eq!((renderer.width(), renderer.height()), (200, 100));
        renderer
            .set_projection(&Projection::Orthographic {
                left: -3.0,
                right: 3.0,
                bottom: -1.5,
                top: 1.5,
                near: 0.0,
                far: 200.0,
            })
            .unwrap();
        let p = renderer
            .project_vertex(&Transform::identity(), &Vec4::new([0.0, 0.0, 0.0, 1.0]))
            .unwrap();
        assert!((p.x() - 100.0).abs() < 1e-3 && (p.y() - 50.0).abs() < 1e-3);

        renderer.begin_frame();
        renderer.draw_model(&Model::cube(1.0), &Transform::identity());
        assert_eq!(renderer.frame_buffer().pixel_at(100, 50), Some(Colour::RED.argb()));
        // a 1 unit face is 33 pixels wide on both axes
        assert_eq!(renderer.frame_buffer().pixel_at(120, 50), Some(Colour::BLACK.argb()));

        assert!(renderer.resize(0, 10).is_err());
        assert_eq!(renderer.width(), 200);
    }

    #[test]
    fn test_invalid_light_rejected() {
        let mut renderer = Renderer::new(&small_config()).unwrap();
        assert_eq!(
            renderer.set_light_direction(&Vec3::zero()),
            Err(Error::DivisionByZero)
        );
    }
}

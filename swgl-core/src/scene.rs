/// Scene capability trait and the viewer driving it from pointer and tick
/// events
use tracing::debug;

use crate::arcball::Arcball;
use crate::config::RendererConfig;
use crate::error::Result;
use crate::framebuffer::Frame;
use crate::projection::Projection;
use crate::quaternion::Quaternion;
use crate::renderer::{FrameStats, Renderer};

/// One interactive demo: owns its models and animation state
pub trait Scene {
    fn name(&self) -> &str;

    /// Called once before the first frame
    fn init(&mut self, _renderer: &mut Renderer) -> Result<()> {
        Ok(())
    }

    /// Advance animation by `dt` seconds
    fn update(&mut self, dt: f32);

    /// A key the front end does not handle itself
    fn on_key(&mut self, _key: char) {}

    /// Draw into an already cleared renderer, rotated by the arcball
    /// `orientation`
    fn render(&mut self, renderer: &mut Renderer, orientation: &Quaternion<f32>) -> Result<()>;
}

/// Connects a [`Scene`] to the outside world.
///
/// The front end feeds pointer events in framebuffer pixels and frame ticks,
/// and reads the finished frame back with [`Viewer::frame_buffer`].
pub struct Viewer<S: Scene> {
    scene: S,
    renderer: Renderer,
    arcball: Arcball,
    frames: u64,
}

impl<S: Scene> Viewer<S> {
    pub fn new(config: &RendererConfig, mut scene: S) -> Result<Self> {
        let mut renderer = Renderer::new(config)?;
        let arcball = Arcball::new(config.width, config.height)?
            .with_orientation(config.initial_orientation.quaternion()?);
        scene.init(&mut renderer)?;
        debug!(
            scene = scene.name(),
            width = config.width,
            height = config.height,
            "viewer created"
        );
        Ok(Self {
            scene,
            renderer,
            arcball,
            frames: 0,
        })
    }

    pub fn on_pointer_down(&mut self, x: i32, y: i32) {
        self.arcball.press(x, y);
    }

    pub fn on_pointer_move(&mut self, x: i32, y: i32) {
        self.arcball.drag(x, y);
    }

    pub fn on_pointer_up(&mut self, x: i32, y: i32) {
        self.arcball.release(x, y);
    }

    pub fn on_key(&mut self, key: char) {
        self.scene.on_key(key);
    }

    /// Follow a new output size. The frame buffer starts out cleared and
    /// `projection` replaces the old one, typically refitted to the new
    /// aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32, projection: &Projection) -> Result<()> {
        self.renderer.set_projection(projection)?;
        self.renderer.resize(width, height)?;
        self.arcball.resize(width, height);
        debug!(width, height, "viewer resized");
        Ok(())
    }

    /// Advance the scene by `dt` seconds and render a new frame
    pub fn on_frame_tick(&mut self, dt: f32) -> Result<FrameStats> {
        self.scene.update(dt);
        self.renderer.begin_frame();
        let orientation = self.arcball.orientation();
        self.scene.render(&mut self.renderer, &orientation)?;
        self.frames += 1;
        Ok(self.renderer.end_frame())
    }

    /// The last finished frame as packed ARGB
    pub fn frame_buffer(&self) -> Frame<'_> {
        self.renderer.frame_buffer().frame()
    }

    /// Draw id of whatever is visible at `(x, y)`
    pub fn pick(&self, x: i32, y: i32) -> Option<u32> {
        self.renderer.frame_buffer().id_at(x, y)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn arcball(&self) -> &Arcball {
        &self.arcball
    }

    pub fn arcball_mut(&mut self) -> &mut Arcball {
        &mut self.arcball
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Colour;
    use crate::error::Error;
    use crate::geometry::Model;
    use crate::transform::Transform;

    struct Cube {
        model: Model,
        elapsed: f32,
        initialised: bool,
    }

    impl Cube {
        fn new() -> Self {
            Self {
                model: Model::cube(1.0),
                elapsed: 0.0,
                initialised: false,
            }
        }
    }

    impl Scene for Cube {
        fn name(&self) -> &str {
            "cube"
        }

        fn init(&mut self, _renderer: &mut Renderer) -> Result<()> {
            self.initialised = true;
            Ok(())
        }

        fn update(&mut self, dt: f32) {
            self.elapsed += dt;
        }

        fn on_key(&mut self, key: char) {
            if key == 'w' {
                self.model = Model::cube(1.0).into_wireframe();
            }
        }

        fn render(&mut self, renderer: &mut Renderer, orientation: &Quaternion<f32>) -> Result<()> {
            renderer.set_draw_id(1);
            renderer.draw_model(&self.model, &Transform::rotation4(orientation));
            Ok(())
        }
    }

    struct Failing;

    impl Scene for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn update(&mut self, _dt: f32) {}

        fn render(
            &mut self,
            _renderer: &mut Renderer,
            _orientation: &Quaternion<f32>,
        ) -> Result<()> {
            Err(Error::InvalidOperation("nothing to draw"))
        }
    }

    fn config() -> RendererConfig {
        RendererConfig {
            width: 100,
            height: 100,
            ..RendererConfig::default()
        }
    }

    #[test]
    fn test_tick_renders_scene() {
        let mut viewer = Viewer::new(&config(), Cube::new()).unwrap();
        assert!(viewer.scene().initialised);
        let stats = viewer.on_frame_tick(0.5).unwrap();
        assert_eq!(stats.drawn, 2);
        assert_eq!(viewer.frames(), 1);
        assert!((viewer.scene().elapsed - 0.5).abs() < 1e-6);

        let frame = viewer.frame_buffer();
        assert_eq!((frame.width, frame.height), (100, 100));
        assert_eq!(frame.pixel(50, 50), Some(Colour::RED.argb()));
        assert_eq!(viewer.pick(50, 50), Some(1));
        assert_eq!(viewer.pick(0, 0), None);
    }

    #[test]
    fn test_drag_changes_next_frame() {
        let mut viewer = Viewer::new(&config(), Cube::new()).unwrap();
        viewer.on_frame_tick(0.0).unwrap();
        let before = viewer.frame_buffer().pixels.to_vec();

        viewer.on_pointer_down(50, 50);
        viewer.on_pointer_move(80, 40);
        let during = viewer.on_frame_tick(0.0).unwrap();
        assert!(during.drawn > 2, "more faces visible once rotated");
        viewer.on_pointer_up(80, 40);
        assert!(!viewer.arcball().is_dragging());

        viewer.on_frame_tick(0.0).unwrap();
        assert_ne!(viewer.frame_buffer().pixels, &before[..]);
    }

    #[test]
    fn test_keys_reach_scene() {
        let mut viewer = Viewer::new(&config(), Cube::new()).unwrap();
        viewer.on_key('w');
        viewer.on_frame_tick(0.0).unwrap();
        // wireframe: the face interior stays clear
        assert_eq!(viewer.frame_buffer().pixel(42, 42), Some(Colour::BLACK.argb()));
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut viewer = Viewer::new(&config(), Cube::new()).unwrap();
        viewer.on_pointer_move(90, 90);
        viewer.on_pointer_up(90, 90);
        assert_eq!(viewer.arcball().orientation(), Quaternion::identity());
    }

    #[test]
    fn test_resize_keeps_scene_centred() {
        let mut viewer = Viewer::new(&config(), Cube::new()).unwrap();
        viewer.on_frame_tick(0.0).unwrap();
        viewer
            .resize(160, 80, &Projection::orthographic(1.5, 0.0, 200.0))
            .unwrap();
        let frame = viewer.frame_buffer();
        assert_eq!((frame.width, frame.height), (160, 80));

        viewer.on_frame_tick(0.0).unwrap();
        assert_eq!(viewer.frame_buffer().pixel(80, 40), Some(Colour::RED.argb()));
        // pointer mapping follows the new size
        let centre = viewer.arcball().project_to_sphere(80, 40);
        assert!((centre - crate::vector::Vec3::new([0.0, 0.0, 1.0])).magnitude() < 2e-2);

        let bad = Projection::orthographic(0.0, 0.0, 200.0);
        assert!(viewer.resize(100, 100, &bad).is_err());
    }

    #[test]
    fn test_render_error_propagates() {
        let mut viewer = Viewer::new(&config(), Failing).unwrap();
        assert!(viewer.on_frame_tick(0.016).is_err());
        assert_eq!(viewer.frames(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = RendererConfig {
            width: 0,
            ..config()
        };
        assert!(Viewer::new(&bad, Cube::new()).is_err());
    }
}

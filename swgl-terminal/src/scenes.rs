/// Demo scenes shown by the terminal front end.
///
/// Each scene keeps its own animation clock; the arcball orientation is
/// applied on top of whatever the scene animates.
use swgl_core::{
    Colour, FillMode, Model, Quaternion, Renderer, Result, Scene, Transform, Vec3,
};

/// Radians per second of the idle spin
const SPIN: f32 = 0.5;

/// Solid colour cube spinning about its vertical axis.
///
/// Keys: `w` toggles wireframe, `l` toggles lighting, `f` switches between
/// barycentric and scanline fill.
pub struct SpinningCube {
    solid: Model,
    wireframe: Model,
    show_wireframe: bool,
    lighting: bool,
    fill_mode: FillMode,
    angle: f32,
}

impl SpinningCube {
    pub fn new() -> Self {
        Self {
            solid: Model::cube(1.0),
            wireframe: Model::cube(1.0).into_wireframe(),
            show_wireframe: false,
            lighting: true,
            fill_mode: FillMode::Barycentric,
            angle: 0.0,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl Default for SpinningCube {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for SpinningCube {
    fn name(&self) -> &str {
        "cube"
    }

    fn init(&mut self, renderer: &mut Renderer) -> Result<()> {
        renderer.set_fill_mode(self.fill_mode);
        renderer.set_lighting(self.lighting);
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        self.angle = (self.angle + SPIN * dt) % std::f32::consts::TAU;
    }

    fn on_key(&mut self, key: char) {
        match key {
            'w' => self.show_wireframe = !self.show_wireframe,
            'l' => self.lighting = !self.lighting,
            'f' => {
                self.fill_mode = match self.fill_mode {
                    FillMode::Barycentric => FillMode::Scanline,
                    FillMode::Scanline => FillMode::Barycentric,
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, renderer: &mut Renderer, orientation: &Quaternion<f32>) -> Result<()> {
        renderer.set_fill_mode(self.fill_mode);
        renderer.set_lighting(self.lighting);
        let model = Transform::rotation4(orientation) * Transform::rotation_y4(self.angle);
        let cube = if self.show_wireframe {
            &self.wireframe
        } else {
            &self.solid
        };
        renderer.set_draw_id(1);
        renderer.draw_model(cube, &model);
        Ok(())
    }
}

const ZOOM_STEP: f32 = 0.01;
const ZOOM_MIN: f32 = 0.5;
const ZOOM_MAX: f32 = 1.5;
/// Radians per second about y
const PRISM_SPIN: f32 = 1.2;

/// Unlit wireframe prism, `z`/`x` zoom in and out
pub struct WireframePrism {
    model: Model,
    zoom: f32,
    angle: f32,
}

impl WireframePrism {
    pub fn new() -> Self {
        Self {
            model: Model::triangular_prism(Colour::VIOLET),
            zoom: 1.0,
            angle: 0.0,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }
}

impl Default for WireframePrism {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for WireframePrism {
    fn name(&self) -> &str {
        "prism"
    }

    fn init(&mut self, renderer: &mut Renderer) -> Result<()> {
        // every edge stays visible
        renderer.set_lighting(false);
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        self.angle = (self.angle + PRISM_SPIN * dt) % std::f32::consts::TAU;
    }

    fn on_key(&mut self, key: char) {
        let step = match key {
            'z' => ZOOM_STEP,
            'x' => -ZOOM_STEP,
            _ => return,
        };
        self.zoom = (self.zoom + step).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    fn render(&mut self, renderer: &mut Renderer, orientation: &Quaternion<f32>) -> Result<()> {
        let model = Transform::rotation4(orientation)
            * Transform::rotation_y4(self.angle)
            * Transform::scaling4(self.zoom, self.zoom, self.zoom);
        renderer.draw_model(&self.model, &model);
        Ok(())
    }
}

/// Design size the primitive coordinates are laid out for
const DESIGN_WIDTH: f32 = 640.0;
const DESIGN_HEIGHT: f32 = 480.0;
/// Radians per second of the sweeping line
const SWEEP: f32 = 1.0;
const SWEEP_LENGTH: f32 = 180.0;

/// Raster-space test pattern: two overlapping filled triangles at different
/// depths, a wireframe triangle and a line sweeping around the centre.
///
/// Ignores the arcball. The triangles are given clockwise on screen, so the
/// scene switches to the winding-agnostic scanline fill.
pub struct PrimitivesScene {
    angle: f32,
}

impl PrimitivesScene {
    pub fn new() -> Self {
        Self { angle: 0.0 }
    }
}

impl Default for PrimitivesScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PrimitivesScene {
    fn name(&self) -> &str {
        "primitives"
    }

    fn init(&mut self, renderer: &mut Renderer) -> Result<()> {
        renderer.set_fill_mode(FillMode::Scanline);
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        self.angle = (self.angle + SWEEP * dt) % std::f32::consts::TAU;
    }

    fn render(&mut self, renderer: &mut Renderer, _orientation: &Quaternion<f32>) -> Result<()> {
        let scale = (renderer.width() as f32 / DESIGN_WIDTH)
            .min(renderer.height() as f32 / DESIGN_HEIGHT);
        let p = |x: f32, y: f32, z: f32| Vec3::new([x * scale, y * scale, z]);

        renderer.draw_triangle(
            &[p(10.0, 50.0, 10.0), p(400.0, 100.0, 10.0), p(290.0, 380.0, 10.0)],
            Colour::RED,
            true,
        );
        renderer.draw_triangle(
            &[p(50.0, 350.0, 2.0), p(130.0, 40.0, 20.0), p(380.0, 200.0, 5.0)],
            Colour::GREEN,
            true,
        );
        renderer.draw_triangle(
            &[p(250.0, 250.0, 1.0), p(70.0, 400.0, 1.0), p(320.0, 400.0, 1.0)],
            Colour::BLUE,
            false,
        );

        let (cx, cy) = (renderer.width() as f32 / 2.0, renderer.height() as f32 / 2.0);
        let r = SWEEP_LENGTH * scale;
        let (sin, cos) = self.angle.sin_cos();
        renderer.draw_line(
            &Vec3::new([cx, cy, 0.5]),
            &Vec3::new([cx + r * cos, cy - r * sin, 0.5]),
            Colour::INDIGO,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swgl_core::{RendererConfig, Viewer};

    fn config(width: u32, height: u32) -> RendererConfig {
        RendererConfig {
            width,
            height,
            ..RendererConfig::default()
        }
    }

    fn count(viewer: &Viewer<impl Scene>, colour: Colour) -> usize {
        viewer
            .frame_buffer()
            .pixels
            .iter()
            .filter(|&&p| p == colour.argb())
            .count()
    }

    #[test]
    fn test_cube_front_face() {
        let mut viewer = Viewer::new(&config(100, 100), SpinningCube::new()).unwrap();
        let stats = viewer.on_frame_tick(0.0).unwrap();
        assert_eq!(stats.drawn, 2);
        assert_eq!(viewer.frame_buffer().pixel(50, 50), Some(Colour::RED.argb()));
    }

    #[test]
    fn test_cube_spins_and_toggles() {
        let mut viewer = Viewer::new(&config(100, 100), SpinningCube::new()).unwrap();
        viewer.on_frame_tick(1.0).unwrap();
        assert!((viewer.scene().angle() - SPIN).abs() < 1e-6);

        viewer.on_key('l');
        let unlit = viewer.on_frame_tick(0.0).unwrap();
        assert_eq!(unlit.culled, 0);
        // without the light test the fill still rejects faces wound away
        assert_eq!((unlit.drawn, unlit.skipped), (4, 8));

        viewer.on_key('l');
        viewer.on_key('w');
        viewer.on_frame_tick(0.0).unwrap();
        assert_eq!(viewer.frame_buffer().pixel(50, 50), Some(Colour::BLACK.argb()));
    }

    #[test]
    fn test_prism_zoom_is_clamped() {
        let mut prism = WireframePrism::new();
        for _ in 0..200 {
            prism.on_key('z');
        }
        assert!((prism.zoom() - ZOOM_MAX).abs() < 1e-6);
        for _ in 0..200 {
            prism.on_key('x');
        }
        assert!((prism.zoom() - ZOOM_MIN).abs() < 1e-6);
        prism.on_key('q');
        assert!((prism.zoom() - ZOOM_MIN).abs() < 1e-6);
    }

    #[test]
    fn test_prism_draws_every_edge_unlit() {
        let mut viewer = Viewer::new(&config(120, 120), WireframePrism::new()).unwrap();
        let stats = viewer.on_frame_tick(0.3).unwrap();
        assert_eq!(stats.culled, 0);
        assert_eq!(stats.drawn, 8);
        assert!(count(&viewer, Colour::VIOLET) > 0);
    }

    #[test]
    fn test_primitives_pattern() {
        let mut viewer = Viewer::new(&config(640, 480), PrimitivesScene::new()).unwrap();
        viewer.on_frame_tick(0.0).unwrap();
        let frame = viewer.frame_buffer();
        assert_eq!(frame.pixel(380, 120), Some(Colour::RED.argb()));
        assert_eq!(frame.pixel(100, 300), Some(Colour::GREEN.argb()));
        assert_eq!(frame.pixel(200, 400), Some(Colour::BLUE.argb()));
        assert_eq!(frame.pixel(450, 240), Some(Colour::INDIGO.argb()));
        assert_eq!(frame.pixel(600, 450), Some(Colour::BLACK.argb()));
    }

    #[test]
    fn test_primitives_scale_to_viewport() {
        let mut viewer = Viewer::new(&config(320, 240), PrimitivesScene::new()).unwrap();
        viewer.on_frame_tick(0.0).unwrap();
        let frame = viewer.frame_buffer();
        assert_eq!(frame.pixel(190, 60), Some(Colour::RED.argb()));
        assert_eq!(frame.pixel(50, 150), Some(Colour::GREEN.argb()));
    }
}

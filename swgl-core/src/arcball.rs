/// Arcball controller turning pointer drags into rotations
use tracing::trace;

use crate::error::{Error, Result};
use crate::quaternion::Quaternion;
use crate::vector::Vec3;

/// Sphere radius in normalized pointer units
const RADIUS: f32 = 1.0;

/// Sphere/hyperbolic-sheet trackball.
///
/// A gesture is press, any number of drags, release. While it is in progress
/// the rotation from the press point to the current point is held as the
/// `live` quaternion; the effective orientation is `live * committed`. Release
/// folds `live` into `committed`.
#[derive(Debug, Clone)]
pub struct Arcball {
    width: u32,
    height: u32,
    initial: Quaternion<f32>,
    committed: Quaternion<f32>,
    live: Quaternion<f32>,
    anchor: Option<Vec3<f32>>,
    locked: bool,
}

impl Arcball {
    /// Controller for a `width × height` pointer area (both at least 2)
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width < 2 || height < 2 {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self {
            width,
            height,
            initial: Quaternion::identity(),
            committed: Quaternion::identity(),
            live: Quaternion::identity(),
            anchor: None,
            locked: false,
        })
    }

    /// Start from `orientation` instead of the identity; [`Arcball::reset`]
    /// returns here.
    pub fn with_orientation(mut self, orientation: Quaternion<f32>) -> Self {
        self.initial = orientation;
        self.committed = orientation;
        self
    }

    /// Effective orientation for the current frame
    pub fn orientation(&self) -> Quaternion<f32> {
        self.live * self.committed
    }

    /// Orientation from all released gestures
    pub fn committed(&self) -> Quaternion<f32> {
        self.committed
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// While locked, pointer input is ignored. Locking ends any gesture in
    /// progress as if it had been released.
    pub fn set_locked(&mut self, locked: bool) {
        if locked {
            self.finish();
        }
        self.locked = locked;
    }

    pub fn reset(&mut self) {
        self.committed = self.initial;
        self.live = Quaternion::identity();
        self.anchor = None;
        trace!("arcball reset");
    }

    /// Follow a resized pointer area; ignored below 2×2
    pub fn resize(&mut self, width: u32, height: u32) {
        if width >= 2 && height >= 2 {
            self.width = width;
            self.height = height;
        }
    }

    pub fn press(&mut self, x: i32, y: i32) {
        if self.locked {
            return;
        }
        let p = self.project_to_sphere(x, y);
        trace!(x, y, anchor = %p, "arcball press");
        self.anchor = Some(p);
        self.live = Quaternion::identity();
    }

    pub fn drag(&mut self, x: i32, y: i32) {
        if self.locked {
            return;
        }
        let Some(p) = self.anchor else {
            return;
        };
        let q = self.project_to_sphere(x, y);
        self.live = rotation_between(&p, &q);
        trace!(x, y, live = %self.live, "arcball drag");
    }

    pub fn release(&mut self, x: i32, y: i32) {
        if self.locked || self.anchor.is_none() {
            return;
        }
        self.drag(x, y);
        self.finish();
        trace!(x, y, committed = %self.committed, "arcball release");
    }

    /// Map a pointer position to a point on the sphere, or on the hyperbolic
    /// sheet outside it.
    ///
    /// `x` and `y` are scaled into `[-1, 1]` with y pointing up. Inside
    /// `x² + y² <= r²/2` the point lies on the sphere of radius `r`; beyond
    /// that `z = (r²/2) / sqrt(x² + y²)`, which meets the sphere continuously.
    pub fn project_to_sphere(&self, x: i32, y: i32) -> Vec3<f32> {
        let px = x as f32 * 2.0 / (self.width - 1) as f32 - 1.0;
        let py = 1.0 - y as f32 * 2.0 / (self.height - 1) as f32;
        let r2 = RADIUS * RADIUS;
        let d2 = px * px + py * py;
        let pz = if d2 <= r2 / 2.0 {
            (r2 - d2).sqrt()
        } else {
            (r2 / 2.0) / d2.sqrt()
        };
        Vec3::new([px, py, pz])
    }

    fn finish(&mut self) {
        if self.anchor.take().is_none() {
            return;
        }
        let folded = self.live * self.committed;
        // renormalize so repeated gestures do not drift off unit length
        self.committed = folded.unit().unwrap_or(folded);
        self.live = Quaternion::identity();
    }
}

/// Rotation carrying direction `p` onto direction `q`.
///
/// Parallel directions give the identity; antiparallel ones a half turn about
/// an axis orthogonal to `p`.
pub fn rotation_between(p: &Vec3<f32>, q: &Vec3<f32>) -> Quaternion<f32> {
    let denom = p.magnitude() * q.magnitude();
    if !denom.is_finite() || denom <= 0.0 {
        return Quaternion::identity();
    }
    let cos = (p.dot(q) / denom).clamp(-1.0, 1.0);
    let angle = cos.acos();
    match Quaternion::from_axis_angle(&p.cross(q), angle) {
        Ok(rotation) => rotation,
        Err(_) if cos > 0.0 => Quaternion::identity(),
        Err(_) => {
            Quaternion::from_axis_angle(&orthogonal(p), std::f32::consts::PI)
                .unwrap_or_else(|_| Quaternion::identity())
        }
    }
}

/// Some direction orthogonal to `p`
fn orthogonal(p: &Vec3<f32>) -> Vec3<f32> {
    let x = Vec3::new([1.0, 0.0, 0.0]);
    let y = Vec3::new([0.0, 1.0, 0.0]);
    if p.x().abs() < p.y().abs() {
        p.cross(&x)
    } else {
        p.cross(&y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arcball() -> Arcball {
        Arcball::new(600, 600).unwrap()
    }

    fn close(a: &Vec3<f32>, b: &Vec3<f32>, eps: f32) -> bool {
        (*a - *b).magnitude() < eps
    }

    #[test]
    fn test_rejects_tiny_area() {
        assert!(Arcball::new(1, 100).is_err());
    }

    #[test]
    fn test_projection_centre_and_edges() {
        let ball = arcball();
        let c = ball.project_to_sphere(300, 300);
        assert!(close(&c, &Vec3::new([0.0, 0.0, 1.0]), 1e-2));

        // top-left corner is outside the sphere: on the sheet, y up
        let corner = ball.project_to_sphere(0, 0);
        assert_eq!((corner.x(), corner.y()), (-1.0, 1.0));
        assert!((corner.z() - 0.5 / 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_projection_continuous_at_boundary() {
        let ball = Arcball::new(1001, 1001).unwrap();
        // x = 2k/1000 - 1; the split is at x² = 1/2
        let inside = ball.project_to_sphere(853, 500);
        let outside = ball.project_to_sphere(854, 500);
        assert!(inside.x() * inside.x() <= 0.5);
        assert!(outside.x() * outside.x() > 0.5);
        assert!((inside.z() - outside.z()).abs() < 5e-3);
    }

    #[test]
    fn test_horizontal_drag_rotates_about_y() {
        let mut ball = arcball();
        ball.press(300, 300);
        ball.drag(400, 300);
        assert!(ball.is_dragging());
        let (axis, angle) = ball.orientation().to_axis_angle();
        assert!(close(&axis, &Vec3::new([0.0, 1.0, 0.0]), 1e-2), "{axis}");
        assert!(angle > 0.0 && angle < std::f32::consts::FRAC_PI_2);
        // nothing committed until release
        assert_eq!(ball.committed(), Quaternion::identity());

        ball.release(400, 300);
        assert!(!ball.is_dragging());
        assert_eq!(ball.committed(), ball.orientation());
    }

    #[test]
    fn test_vertical_drag_tips_front_upwards() {
        let mut ball = arcball();
        ball.press(300, 300);
        ball.drag(300, 200);
        let front = ball.orientation().rotate(&Vec3::new([0.0, 0.0, 1.0]));
        assert!(front.y() > 0.1, "{front}");
    }

    #[test]
    fn test_release_folds_live_into_committed() {
        let mut ball = arcball();
        ball.press(300, 300);
        ball.release(400, 300);
        let first = ball.committed();

        ball.press(300, 300);
        ball.drag(300, 400);
        let second = rotation_between(
            &ball.project_to_sphere(300, 300),
            &ball.project_to_sphere(300, 400),
        );
        assert_eq!(ball.orientation(), second * first);
        ball.release(300, 400);
        assert_eq!(ball.committed(), second * first);
    }

    #[test]
    fn test_parallel_and_antiparallel() {
        let z = Vec3::new([0.0, 0.0, 1.0]);
        assert_eq!(rotation_between(&z, &(z * 3.0)), Quaternion::identity());

        let half = rotation_between(&z, &-z);
        assert!(half.scalar().abs() < 1e-6);
        assert!(close(&half.rotate(&z), &-z, 1e-5));

        let mut ball = arcball();
        ball.press(120, 80);
        ball.drag(120, 80);
        assert_eq!(ball.orientation(), Quaternion::identity());
    }

    #[test]
    fn test_many_gestures_stay_unit() {
        let mut ball = arcball();
        for i in 0..500 {
            ball.press(300, 300);
            ball.drag(300 + (i % 7) as i32, 300 - (i % 5) as i32);
            ball.release(301 + (i % 7) as i32, 299 - (i % 5) as i32);
        }
        assert!((ball.committed().magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_lock_ignores_input() {
        let mut ball = arcball();
        ball.set_locked(true);
        ball.press(300, 300);
        ball.drag(500, 300);
        ball.release(500, 300);
        assert_eq!(ball.orientation(), Quaternion::identity());
        assert!(ball.is_locked());
    }

    #[test]
    fn test_lock_mid_gesture_commits() {
        let mut ball = arcball();
        ball.press(300, 300);
        ball.drag(400, 300);
        let during = ball.orientation();
        ball.set_locked(true);
        assert!(!ball.is_dragging());
        assert_eq!(ball.committed(), during);
    }

    #[test]
    fn test_resize_rescales_pointer_mapping() {
        let mut ball = arcball();
        ball.resize(200, 100);
        let c = ball.project_to_sphere(100, 50);
        assert!(c.x().abs() < 1e-2 && c.y().abs() < 2e-2, "{c}");
        let corner = ball.project_to_sphere(199, 99);
        assert_eq!((corner.x(), corner.y()), (1.0, -1.0));

        // too small to map, keeps the old size
        ball.resize(1, 1);
        assert_eq!(ball.project_to_sphere(199, 99), corner);
    }

    #[test]
    fn test_initial_orientation_and_reset() {
        let start =
            Quaternion::from_axis_angle(&Vec3::new([0.0, 0.0, 1.0]), std::f32::consts::FRAC_PI_4)
                .unwrap();
        let mut ball = arcball().with_orientation(start);
        assert_eq!(ball.orientation(), start);
        ball.press(300, 300);
        ball.release(450, 350);
        assert_ne!(ball.orientation(), start);
        ball.reset();
        assert_eq!(ball.orientation(), start);
    }
}

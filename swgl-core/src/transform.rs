/// Factory functions for rotation, scaling, translation, projection and
/// viewport matrices
use crate::error::{Error, Result};
use crate::matrix::{Mat2, Mat3, Mat4, Matrix};
use crate::quaternion::Quaternion;
use crate::scalar::Real;

/// Transform builder for 2D and 3D transformations.
///
/// The `*3` rotation factories act on 3-vectors; the `*4` variants embed the
/// same rotation in a homogeneous 4×4 matrix. `scaling3`/`translation3` are
/// homogeneous 2D transforms.
pub struct Transform;

impl Transform {
    pub fn identity<T: Real>() -> Mat4<T> {
        Mat4::identity()
    }

    /// Counter-clockwise rotation of 2-vectors
    pub fn rotation2<T: Real>(angle: T) -> Mat2<T> {
        let (s, c) = (angle.sin(), angle.cos());
        Matrix::new([[c, -s], [s, c]])
    }

    pub fn rotation_x3<T: Real>(angle: T) -> Mat3<T> {
        let (s, c) = (angle.sin(), angle.cos());
        let (o, l) = (T::ZERO, T::ONE);
        Matrix::new([[l, o, o], [o, c, -s], [o, s, c]])
    }

    pub fn rotation_y3<T: Real>(angle: T) -> Mat3<T> {
        let (s, c) = (angle.sin(), angle.cos());
        let (o, l) = (T::ZERO, T::ONE);
        Matrix::new([[c, o, s], [o, l, o], [-s, o, c]])
    }

    pub fn rotation_z3<T: Real>(angle: T) -> Mat3<T> {
        let (s, c) = (angle.sin(), angle.cos());
        let (o, l) = (T::ZERO, T::ONE);
        Matrix::new([[c, -s, o], [s, c, o], [o, o, l]])
    }

    pub fn rotation_x4<T: Real>(angle: T) -> Mat4<T> {
        Self::homogeneous(&Self::rotation_x3(angle))
    }

    pub fn rotation_y4<T: Real>(angle: T) -> Mat4<T> {
        Self::homogeneous(&Self::rotation_y3(angle))
    }

    pub fn rotation_z4<T: Real>(angle: T) -> Mat4<T> {
        Self::homogeneous(&Self::rotation_z3(angle))
    }

    /// Roll about x, then pitch about y, then yaw about z
    pub fn rotation_ypr3<T: Real>(yaw: T, pitch: T, roll: T) -> Mat3<T> {
        Self::rotation_z3(yaw) * Self::rotation_y3(pitch) * Self::rotation_x3(roll)
    }

    pub fn rotation_ypr4<T: Real>(yaw: T, pitch: T, roll: T) -> Mat4<T> {
        Self::homogeneous(&Self::rotation_ypr3(yaw, pitch, roll))
    }

    /// Rotation matrix of a unit quaternion (index 0 is the scalar part)
    pub fn rotation3<T: Real>(q: &Quaternion<T>) -> Mat3<T> {
        let (q0, q1, q2, q3) = (q[0], q[1], q[2], q[3]);
        let (l, t) = (T::ONE, T::TWO);
        Matrix::new([
            [
                l - t * (q2 * q2 + q3 * q3),
                t * (q1 * q2 - q0 * q3),
                t * (q1 * q3 + q0 * q2),
            ],
            [
                t * (q1 * q2 + q0 * q3),
                l - t * (q1 * q1 + q3 * q3),
                t * (q2 * q3 - q0 * q1),
            ],
            [
                t * (q1 * q3 - q0 * q2),
                t * (q2 * q3 + q0 * q1),
                l - t * (q1 * q1 + q2 * q2),
            ],
        ])
    }

    pub fn rotation4<T: Real>(q: &Quaternion<T>) -> Mat4<T> {
        Self::homogeneous(&Self::rotation3(q))
    }

    /// Homogeneous 2D scaling
    pub fn scaling3<T: Real>(sx: T, sy: T) -> Mat3<T> {
        let (o, l) = (T::ZERO, T::ONE);
        Matrix::new([[sx, o, o], [o, sy, o], [o, o, l]])
    }

    /// Homogeneous 2D translation
    pub fn translation3<T: Real>(tx: T, ty: T) -> Mat3<T> {
        let (o, l) = (T::ZERO, T::ONE);
        Matrix::new([[l, o, tx], [o, l, ty], [o, o, l]])
    }

    pub fn scaling4<T: Real>(sx: T, sy: T, sz: T) -> Mat4<T> {
        let (o, l) = (T::ZERO, T::ONE);
        Matrix::new([
            [sx, o, o, o],
            [o, sy, o, o],
            [o, o, sz, o],
            [o, o, o, l],
        ])
    }

    pub fn translation4<T: Real>(tx: T, ty: T, tz: T) -> Mat4<T> {
        let (o, l) = (T::ZERO, T::ONE);
        Matrix::new([
            [l, o, o, tx],
            [o, l, o, ty],
            [o, o, l, tz],
            [o, o, o, l],
        ])
    }

    /// Orthographic projection of the box `[l, r] × [b, t] × [-n, -f]` onto
    /// the NDC cube.
    pub fn orthographic<T: Real>(l: T, r: T, b: T, t: T, n: T, f: T) -> Result<Mat4<T>> {
        check_bounds(l, r, b, t, n, f)?;
        let (o, one, two) = (T::ZERO, T::ONE, T::TWO);
        Ok(Matrix::new([
            [two / (r - l), o, o, -(r + l) / (r - l)],
            [o, two / (t - b), o, -(t + b) / (t - b)],
            [o, o, -two / (f - n), -(f + n) / (f - n)],
            [o, o, o, one],
        ]))
    }

    /// Perspective projection of the viewing frustum whose near plane spans
    /// `[l, r] × [b, t]` at distance `n`.
    pub fn frustum<T: Real>(l: T, r: T, b: T, t: T, n: T, f: T) -> Result<Mat4<T>> {
        check_bounds(l, r, b, t, n, f)?;
        check_depth_range(n, f)?;
        let (o, two) = (T::ZERO, T::TWO);
        Ok(Matrix::new([
            [two * n / (r - l), o, (r + l) / (r - l), o],
            [o, two * n / (t - b), (t + b) / (t - b), o],
            [o, o, -(f + n) / (f - n), -two * f * n / (f - n)],
            [o, o, -T::ONE, o],
        ]))
    }

    /// Perspective projection from a vertical field of view (radians)
    pub fn perspective<T: Real>(fovy: T, aspect: T, n: T, f: T) -> Result<Mat4<T>> {
        if !fovy.is_finite() || fovy <= T::ZERO || fovy >= T::PI {
            return Err(Error::DegenerateProjection("fovy must lie in (0, pi)"));
        }
        if !aspect.is_finite() || aspect <= T::ZERO {
            return Err(Error::DegenerateProjection("aspect must be positive"));
        }
        if n.approx_eq(f) {
            return Err(Error::DegenerateProjection("near equals far"));
        }
        check_depth_range(n, f)?;
        let cot = T::ONE / (fovy * T::HALF).tan();
        let o = T::ZERO;
        Ok(Matrix::new([
            [cot / aspect, o, o, o],
            [o, cot, o, o],
            [o, o, (f + n) / (n - f), T::TWO * f * n / (n - f)],
            [o, o, -T::ONE, o],
        ]))
    }

    /// NDC to raster coordinates for a `width × height` buffer.
    ///
    /// Scales by `(w/2, -h/2, w/2)` and translates by `(w/2, h/2, w/2 + 0.5)`,
    /// so y grows downwards and the depth of anything inside the NDC cube is
    /// at least 0.5.
    pub fn viewport<T: Real>(width: u32, height: u32) -> Result<Mat4<T>> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        let hw = T::from_f64(f64::from(width)) * T::HALF;
        let hh = T::from_f64(f64::from(height)) * T::HALF;
        let scale = Self::scaling4(hw, -hh, hw);
        let translate = Self::translation4(hw, hh, hw + T::HALF);
        Ok(translate * scale)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix<T: Real>(model: &Mat4<T>, view: &Mat4<T>, projection: &Mat4<T>) -> Mat4<T> {
        *projection * *view * *model
    }

    fn homogeneous<T: Real>(m: &Mat3<T>) -> Mat4<T> {
        let mut out = Mat4::identity();
        for r in 0..3 {
            for c in 0..3 {
                out[r][c] = m[r][c];
            }
        }
        out
    }
}

fn check_bounds<T: Real>(l: T, r: T, b: T, t: T, n: T, f: T) -> Result<()> {
    if ![l, r, b, t, n, f].iter().all(|v| v.is_finite()) {
        return Err(Error::DegenerateProjection("bounds must be finite"));
    }
    if l.approx_eq(r) {
        return Err(Error::DegenerateProjection("left equals right"));
    }
    if b.approx_eq(t) {
        return Err(Error::DegenerateProjection("bottom equals top"));
    }
    if n.approx_eq(f) {
        return Err(Error::DegenerateProjection("near equals far"));
    }
    Ok(())
}

fn check_depth_range<T: Real>(n: T, f: T) -> Result<()> {
    if !n.is_finite() || !f.is_finite() || n <= T::ZERO || f <= T::ZERO {
        return Err(Error::DegenerateProjection(
            "perspective near and far must be positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{Vec2, Vec3, Vec4};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, PI};

    fn assert_close4(ours: &Mat4<f64>, theirs: &nalgebra::Matrix4<f64>) {
        for r in 0..4 {
            for c in 0..4 {
                assert!(
                    (ours[r][c] - theirs[(r, c)]).abs() < 1e-9,
                    "element ({r}, {c}): {} vs {}",
                    ours[r][c],
                    theirs[(r, c)]
                );
            }
        }
    }

    #[test]
    fn test_rotation2() {
        let v = Transform::rotation2(FRAC_PI_2) * Vec2::new([1.0, 0.0]);
        assert_eq!(v, Vec2::new([0.0, 1.0]));
    }

    #[test]
    fn test_axis_rotations_match_nalgebra() {
        use nalgebra::{Rotation3, Vector3};
        let angle = 0.7;
        let cases = [
            (Transform::rotation_x4(angle), Vector3::x_axis()),
            (Transform::rotation_y4(angle), Vector3::y_axis()),
            (Transform::rotation_z4(angle), Vector3::z_axis()),
        ];
        for (ours, axis) in cases {
            let theirs = Rotation3::from_axis_angle(&axis, angle).to_homogeneous();
            assert_close4(&ours, &theirs);
        }
    }

    #[test]
    fn test_ypr_order() {
        let m = Transform::rotation_ypr3(FRAC_PI_2, 0.0, FRAC_PI_2);
        // roll x -> x, then yaw x -> y
        assert_eq!(m * Vec3::new([1.0, 0.0, 0.0]), Vec3::new([0.0, 1.0, 0.0]));
        // roll y -> z, then yaw leaves z
        assert_eq!(m * Vec3::new([0.0, 1.0, 0.0]), Vec3::new([0.0, 0.0, 1.0]));
        assert_eq!(
            Transform::rotation_ypr4(0.3, 0.2, 0.1),
            Transform::rotation_z4(0.3) * Transform::rotation_y4(0.2) * Transform::rotation_x4(0.1)
        );
    }

    #[test]
    fn test_quaternion_matrix_matches_nalgebra() {
        use nalgebra::{Unit, UnitQuaternion, Vector3};
        let axis = Vec3::new([0.2, -1.0, 0.4]);
        let q = Quaternion::from_axis_angle(&axis, 1.3).unwrap();
        let theirs = UnitQuaternion::from_axis_angle(
            &Unit::new_normalize(Vector3::new(0.2, -1.0, 0.4)),
            1.3,
        )
        .to_homogeneous();
        assert_close4(&Transform::rotation4(&q), &theirs);
    }

    #[test]
    fn test_quaternion_matrix_agrees_with_rotate() {
        let q = Quaternion::from_axis_angle(&Vec3::new([1.0, 1.0, 1.0]), FRAC_PI_3).unwrap();
        let p = Vec3::new([3.0, -1.0, 2.0]);
        assert_eq!(Transform::rotation3(&q) * p, q.rotate(&p));
    }

    #[test]
    fn test_homogeneous_2d() {
        let m = Transform::translation3(2.0, -1.0) * Transform::scaling3(3.0, 0.5);
        assert_eq!(m * Vec3::new([1.0, 4.0, 1.0]), Vec3::new([5.0, 1.0, 1.0]));
    }

    #[test]
    fn test_translation_and_scaling4() {
        let m = Transform::translation4(1.0, 2.0, 3.0) * Transform::scaling4(2.0, 2.0, 2.0);
        assert_eq!(
            m * Vec4::new([1.0, 1.0, 1.0, 1.0]),
            Vec4::new([3.0, 4.0, 5.0, 1.0])
        );
        // directions ignore translation
        assert_eq!(
            m * Vec4::new([1.0, 0.0, 0.0, 0.0]),
            Vec4::new([2.0, 0.0, 0.0, 0.0])
        );
    }

    #[test]
    fn test_orthographic_matches_nalgebra() {
        let ours = Transform::orthographic(-120.0, 120.0, -100.0, 80.0, 0.0, 200.0).unwrap();
        let theirs = nalgebra::Matrix4::new_orthographic(-120.0, 120.0, -100.0, 80.0, 0.0, 200.0);
        assert_close4(&ours, &theirs);
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let ours = Transform::perspective(FRAC_PI_4, 1.5, 0.1, 140.0).unwrap();
        let theirs = nalgebra::Matrix4::new_perspective(1.5, FRAC_PI_4, 0.1, 140.0);
        assert_close4(&ours, &theirs);
    }

    #[test]
    fn test_frustum_maps_near_and_far_planes() {
        let m = Transform::frustum(-0.2, 0.2, -0.2, 0.2, 0.1, 140.0).unwrap();
        let near = (m * Vec4::new([0.2, 0.2, -0.1, 1.0])).perspective_divide().unwrap();
        assert_eq!(near, Vec4::new([1.0, 1.0, -1.0, 1.0]));
        let far = (m * Vec4::new([0.0, 0.0, -140.0, 1.0])).perspective_divide().unwrap();
        assert!((far[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_projections_fail() {
        assert!(matches!(
            Transform::orthographic(1.0, 1.0, -1.0, 1.0, 0.0, 1.0),
            Err(Error::DegenerateProjection(_))
        ));
        assert!(Transform::orthographic(-1.0, 1.0, 2.0, 2.0, 0.0, 1.0).is_err());
        assert!(Transform::orthographic(-1.0, 1.0, -1.0, 1.0, 5.0, 5.0).is_err());
        assert!(Transform::frustum(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0).is_err());
        assert!(Transform::perspective(0.0, 1.0, 0.1, 10.0).is_err());
        assert!(Transform::perspective(PI, 1.0, 0.1, 10.0).is_err());
        assert!(Transform::perspective(1.0, 0.0, 0.1, 10.0).is_err());
        assert!(Transform::perspective(1.0, 1.0, -0.1, 10.0).is_err());
        assert!(Transform::orthographic(f64::NAN, 1.0, -1.0, 1.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_viewport() {
        let vp = Transform::viewport::<f64>(600, 400).unwrap();
        let corner = vp * Vec4::new([-1.0, 1.0, -1.0, 1.0]);
        assert_eq!(corner, Vec4::new([0.0, 0.0, 0.5, 1.0]));
        let centre = vp * Vec4::new([0.0, 0.0, 0.0, 1.0]);
        assert_eq!(centre, Vec4::new([300.0, 200.0, 300.5, 1.0]));
        assert_eq!(
            Transform::viewport::<f64>(0, 10),
            Err(Error::InvalidViewport { width: 0, height: 10 })
        );
    }

    #[test]
    fn test_mvp_order() {
        let model = Transform::translation4(1.0, 0.0, 0.0);
        let view = Transform::rotation_z4(FRAC_PI_2);
        let projection = Transform::scaling4(2.0, 2.0, 2.0);
        let mvp = Transform::mvp_matrix(&model, &view, &projection);
        let p = mvp * Vec4::new([0.0, 0.0, 0.0, 1.0]);
        assert_eq!(p, Vec4::new([0.0, 2.0, 0.0, 1.0]));
        assert_eq!(Transform::identity::<f64>() * p, p);
    }
}

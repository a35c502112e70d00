/// Line and triangle rasterization into a [`FrameBuffer`]
///
/// All vertices are in raster space: `x`/`y` in pixels with y growing
/// downwards, `z` the positive viewport depth handed to the depth test.
use serde::{Deserialize, Serialize};

use crate::colour::Colour;
use crate::framebuffer::FrameBuffer;
use crate::scalar::Real;
use crate::vector::Vec3;

/// Doubled areas at or below this are treated as degenerate
const AREA_EPSILON: f32 = 1e-6;

/// Filled-triangle algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Bounding box scan with barycentric inside test; respects winding
    #[default]
    Barycentric,
    /// Flat-top/flat-bottom split; draws either winding
    Scanline,
}

/// Fill with the chosen algorithm; `false` when the triangle was rejected
/// without rasterizing
pub fn draw_triangle(
    fb: &mut FrameBuffer,
    v: &[Vec3<f32>; 3],
    colour: Colour,
    mode: FillMode,
) -> bool {
    match mode {
        FillMode::Barycentric => draw_triangle_barycentric(fb, v, colour),
        FillMode::Scanline => draw_triangle_scanline(fb, v, colour),
    }
}

/// DDA line: step along the axis of greatest extent, interpolating depth.
///
/// Sample `i` of `steps` sits at `a + (b - a) * i / steps`. Only the indices
/// whose samples can land inside the buffer are walked, so a segment
/// reaching far off screen costs no more than one crossing it.
pub fn draw_line(fb: &mut FrameBuffer, a: &Vec3<f32>, b: &Vec3<f32>, colour: Colour) {
    if !a.is_finite() || !b.is_finite() {
        return;
    }
    let (ax, ay, az) = (f64::from(a.x()), f64::from(a.y()), f64::from(a.z()));
    let d = *b - *a;
    let (dx, dy, dz) = (f64::from(d.x()), f64::from(d.y()), f64::from(d.z()));
    let steps = dx.abs().max(dy.abs()).ceil();
    if !steps.is_finite() {
        return;
    }
    if steps < 1.0 {
        fb.put_pixel(ax.round() as i32, ay.round() as i32, a.z(), colour);
        return;
    }
    let Some((t0, t1)) = clip_line((ax, ay), (dx, dy), fb.width(), fb.height()) else {
        return;
    };
    // one step moves a whole pixel along the major axis
    let span = u64::from(fb.width().max(fb.height())) + 2;
    let first = (t0 * steps).floor().max(0.0) as u64;
    let last = ((t1 * steps).ceil().min(steps) as u64).min(first.saturating_add(span));
    for i in first..=last {
        let t = i as f64 / steps;
        let (x, y, z) = (ax + dx * t, ay + dy * t, az + dz * t);
        fb.put_pixel(x.round() as i32, y.round() as i32, z as f32, colour);
    }
}

/// Liang-Barsky: parameter range of `a + t d`, `t` in `[0, 1]`, inside the
/// buffer grown by one pixel on every side; `None` when the segment misses
fn clip_line(a: (f64, f64), d: (f64, f64), width: u32, height: u32) -> Option<(f64, f64)> {
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [
        (-d.0, a.0 + 1.0),
        (d.0, f64::from(width) - a.0),
        (-d.1, a.1 + 1.0),
        (d.1, f64::from(height) - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((t0, t1))
}

pub fn draw_wireframe_triangle(fb: &mut FrameBuffer, v: &[Vec3<f32>; 3], colour: Colour) {
    draw_line(fb, &v[0], &v[1], colour);
    draw_line(fb, &v[1], &v[2], colour);
    draw_line(fb, &v[2], &v[0], colour);
}

/// Fill a triangle by testing every pixel centre of its clamped bounding box.
///
/// Only triangles running counter-clockwise on screen are drawn; clockwise
/// and zero-area triangles produce no pixels and return `false`.
pub fn draw_triangle_barycentric(
    fb: &mut FrameBuffer,
    v: &[Vec3<f32>; 3],
    colour: Colour,
) -> bool {
    let [v0, v1, v2] = v;
    if !v0.is_finite() || !v1.is_finite() || !v2.is_finite() {
        return false;
    }
    let area = edge(v0, v1, (v2.x(), v2.y()));
    if !area.is_finite() || area <= AREA_EPSILON {
        return false;
    }

    // Bounding box
    let min_x = v0.x().min(v1.x()).min(v2.x()).floor() as i32;
    let max_x = v0.x().max(v1.x()).max(v2.x()).ceil() as i32;
    let min_y = v0.y().min(v1.y()).min(v2.y()).floor() as i32;
    let max_y = v0.y().max(v1.y()).max(v2.y()).ceil() as i32;

    // Clip to screen bounds
    let min_x = min_x.max(0);
    let max_x = max_x.min(fb.width() as i32 - 1);
    let min_y = min_y.max(0);
    let max_y = max_y.min(fb.height() as i32 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = (x as f32 + 0.5, y as f32 + 0.5);
            let (w0, w1, w2) = barycentric(v0, v1, v2, area, p);
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                let depth = w0 * v0.z() + w1 * v1.z() + w2 * v2.z();
                fb.put_pixel(x, y, depth, colour);
            }
        }
    }
    true
}

/// Twice the signed area of `(a, b, p)`, positive when the three run
/// counter-clockwise on screen
fn edge(a: &Vec3<f32>, b: &Vec3<f32>, p: (f32, f32)) -> f32 {
    (b.y() - a.y()) * (p.0 - a.x()) - (b.x() - a.x()) * (p.1 - a.y())
}

/// Barycentric weights of `p` given the triangle's doubled signed `area`
fn barycentric(
    v0: &Vec3<f32>,
    v1: &Vec3<f32>,
    v2: &Vec3<f32>,
    area: f32,
    p: (f32, f32),
) -> (f32, f32, f32) {
    (
        edge(v1, v2, p) / area,
        edge(v2, v0, p) / area,
        edge(v0, v1, p) / area,
    )
}

/// Fill a triangle by splitting it at its middle vertex into a flat-bottom
/// upper half and a flat-top lower half, then filling row spans.
pub fn draw_triangle_scanline(
    fb: &mut FrameBuffer,
    v: &[Vec3<f32>; 3],
    colour: Colour,
) -> bool {
    if v.iter().any(|p| !p.is_finite()) {
        return false;
    }
    if edge(&v[0], &v[1], (v[2].x(), v[2].y())).abs() <= AREA_EPSILON {
        return false;
    }

    let mut s = *v;
    s.sort_by(|a, b| a.y().total_cmp(&b.y()));
    let [p1, p2, p3] = s;

    if p2.y().approx_eq(p3.y()) {
        fill_flat_bottom(fb, &p1, &p2, &p3, colour);
    } else if p1.y().approx_eq(p2.y()) {
        fill_flat_top(fb, &p1, &p2, &p3, colour);
    } else {
        // point on the long edge p1-p3 level with p2
        let t = (p2.y() - p1.y()) / (p3.y() - p1.y());
        let p4 = lerp3(&p1, &p3, t);
        fill_flat_bottom(fb, &p1, &p2, &p4, colour);
        fill_flat_top(fb, &p2, &p4, &p3, colour);
    }
    true
}

/// `top` above, `b` and `c` on the bottom row
fn fill_flat_bottom(
    fb: &mut FrameBuffer,
    top: &Vec3<f32>,
    b: &Vec3<f32>,
    c: &Vec3<f32>,
    colour: Colour,
) {
    for y in rows(fb, top.y(), b.y()) {
        let t = param(y as f32, top.y(), b.y());
        fill_span(fb, y, &lerp3(top, b, t), &lerp3(top, c, t), colour);
    }
}

/// `a` and `b` on the top row, `bottom` below
fn fill_flat_top(
    fb: &mut FrameBuffer,
    a: &Vec3<f32>,
    b: &Vec3<f32>,
    bottom: &Vec3<f32>,
    colour: Colour,
) {
    for y in rows(fb, a.y(), bottom.y()) {
        let t = param(y as f32, a.y(), bottom.y());
        fill_span(fb, y, &lerp3(a, bottom, t), &lerp3(b, bottom, t), colour);
    }
}

/// Horizontal run between two edge points on row `y`
fn fill_span(fb: &mut FrameBuffer, y: i32, a: &Vec3<f32>, b: &Vec3<f32>, colour: Colour) {
    let (left, right) = if a.x() <= b.x() { (a, b) } else { (b, a) };
    let x0 = (left.x().round() as i32).max(0);
    let x1 = (right.x().round() as i32).min(fb.width() as i32 - 1);
    for x in x0..=x1 {
        let t = param(x as f32, left.x(), right.x());
        let z = left.z() + (right.z() - left.z()) * t;
        fb.put_pixel(x, y, z, colour);
    }
}

/// Pixel rows between two y values, clamped to the buffer
fn rows(fb: &FrameBuffer, y0: f32, y1: f32) -> std::ops::RangeInclusive<i32> {
    let first = (y0.round() as i32).max(0);
    let last = (y1.round() as i32).min(fb.height() as i32 - 1);
    first..=last
}

/// Position of `v` between `a` and `b`, clamped to `[0, 1]`
fn param(v: f32, a: f32, b: f32) -> f32 {
    let d = b - a;
    if d.abs() <= f32::EPSILON {
        return 0.0;
    }
    ((v - a) / d).clamp(0.0, 1.0)
}

fn lerp3(a: &Vec3<f32>, b: &Vec3<f32>, t: f32) -> Vec3<f32> {
    *a + (*b - *a) * t
}

/// Colour, depth and pick buffers sized to the viewport
use crate::colour::Colour;
use crate::error::{Error, Result};

/// Stored depth of a pixel nothing has been drawn to (1/∞)
const FAR: f32 = 0.0;

/// Pick id of a pixel nothing has been drawn to
pub const NO_ID: u32 = 0;

/// Borrowed view of a finished frame, rows top to bottom in packed ARGB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    pub width: u32,
    pub height: u32,
    pub pixels: &'a [u32],
}

impl Frame<'_> {
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

/// Row-major frame buffer with its origin at the top-left.
///
/// The depth buffer holds `1/z` of the viewport depth, so larger values are
/// nearer and the cleared state `0.0` is infinitely far away. Every write
/// goes through [`FrameBuffer::put_pixel`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    background: Colour,
    pixels: Vec<u32>,
    depth: Vec<f32>,
    ids: Vec<u32>,
    draw_id: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32, background: Colour) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        let size = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            background,
            pixels: vec![background.argb(); size],
            depth: vec![FAR; size],
            ids: vec![NO_ID; size],
            draw_id: NO_ID,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> Colour {
        self.background
    }

    pub fn set_background(&mut self, background: Colour) {
        self.background = background;
    }

    /// Reset colour to the background, depth to far and ids to [`NO_ID`]
    pub fn clear(&mut self) {
        self.pixels.fill(self.background.argb());
        self.depth.fill(FAR);
        self.ids.fill(NO_ID);
    }

    /// Id tagged onto every pixel written from now on
    pub fn set_draw_id(&mut self, id: u32) {
        self.draw_id = id;
    }

    /// Write `colour` at `(x, y)` if depth `z` is strictly nearer than what
    /// is stored there.
    ///
    /// Returns whether the pixel was written. Out-of-bounds coordinates and
    /// depths that are not positive and finite are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, z: f32, colour: Colour) -> bool {
        let Some(idx) = self.offset(x, y) else {
            return false;
        };
        if !z.is_finite() || z <= 0.0 {
            return false;
        }
        let inv = 1.0 / z;
        if inv > self.depth[idx] {
            self.depth[idx] = inv;
            self.pixels[idx] = colour.argb();
            self.ids[idx] = self.draw_id;
            true
        } else {
            false
        }
    }

    pub fn pixel_at(&self, x: i32, y: i32) -> Option<u32> {
        self.offset(x, y).map(|idx| self.pixels[idx])
    }

    /// Viewport depth `z` of the nearest fragment at `(x, y)`
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        let idx = self.offset(x, y)?;
        let inv = self.depth[idx];
        (inv > FAR).then(|| 1.0 / inv)
    }

    /// Draw id of the nearest fragment at `(x, y)`
    pub fn id_at(&self, x: i32, y: i32) -> Option<u32> {
        let idx = self.offset(x, y)?;
        Some(self.ids[idx]).filter(|&id| id != NO_ID)
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            width: self.width,
            height: self.height,
            pixels: &self.pixels,
        }
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

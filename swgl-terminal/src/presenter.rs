/// Half-block presenter: two framebuffer rows per terminal row
use crossterm::{
    cursor,
    style::{Color, Colors, Print, ResetColor, SetColors},
    QueueableCommand,
};
use std::io::{self, Write};
use swgl_core::{Colour, Frame};

/// Upper half block; foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// Writes frames as 24-bit colour cells starting at a fixed terminal row
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPresenter {
    top: u16,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave `top` terminal rows above the picture untouched
    pub fn with_top(top: u16) -> Self {
        Self { top }
    }

    /// Terminal cells needed for `frame`, as (columns, rows)
    pub fn cells(frame: &Frame<'_>) -> (u32, u32) {
        (frame.width, frame.height.div_ceil(2))
    }

    /// Queue the frame on `out`; the caller flushes
    pub fn draw<W: Write>(&self, out: &mut W, frame: &Frame<'_>) -> io::Result<()> {
        let (columns, rows) = Self::cells(frame);
        for row in 0..rows {
            let line = u16::try_from(row).unwrap_or(u16::MAX).saturating_add(self.top);
            out.queue(cursor::MoveTo(0, line))?;
            let mut current = None;
            for x in 0..columns {
                let upper = frame.pixel(x, row * 2).unwrap_or(0);
                // odd heights repeat the last row
                let lower = frame.pixel(x, row * 2 + 1).unwrap_or(upper);
                if current != Some((upper, lower)) {
                    out.queue(SetColors(Colors::new(to_color(upper), to_color(lower))))?;
                    current = Some((upper, lower));
                }
                out.queue(Print(HALF_BLOCK))?;
            }
            out.queue(ResetColor)?;
        }
        Ok(())
    }
}

/// Packed ARGB to a terminal true colour; alpha is ignored
pub fn to_color(argb: u32) -> Color {
    let c = Colour::from_argb(argb);
    Color::Rgb {
        r: c.r(),
        g: c.g(),
        b: c.b(),
    }
}

/// Packed 8-bit ARGB colours and the demo palette
use serde::{Deserialize, Serialize};

/// An 8-bit RGBA colour with its packed `0xAARRGGBB` form precomputed.
///
/// Serialized as `{ "r": .., "g": .., "b": .., "a": .. }`; the packed value is
/// rebuilt on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Rgba", into = "Rgba")]
pub struct Colour {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
    argb: u32,
}

#[derive(Serialize, Deserialize)]
struct Rgba {
    r: u8,
    g: u8,
    b: u8,
    #[serde(default = "opaque")]
    a: u8,
}

fn opaque() -> u8 {
    255
}

impl From<Rgba> for Colour {
    fn from(c: Rgba) -> Self {
        Colour::new(c.r, c.g, c.b, c.a)
    }
}

impl From<Colour> for Rgba {
    fn from(c: Colour) -> Self {
        Rgba {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

impl Colour {
    pub const RED: Colour = Colour::rgb(255, 0, 0);
    pub const ORANGE: Colour = Colour::rgb(255, 127, 0);
    pub const YELLOW: Colour = Colour::rgb(255, 255, 0);
    pub const GREEN: Colour = Colour::rgb(0, 255, 0);
    pub const BLUE: Colour = Colour::rgb(0, 0, 255);
    pub const INDIGO: Colour = Colour::rgb(75, 0, 130);
    pub const VIOLET: Colour = Colour::rgb(148, 0, 211);
    pub const BLACK: Colour = Colour::rgb(0, 0, 0);
    pub const WHITE: Colour = Colour::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        let argb = (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32;
        Self { r, g, b, a, argb }
    }

    /// Opaque colour
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn from_argb(argb: u32) -> Self {
        Self::new((argb >> 16) as u8, (argb >> 8) as u8, argb as u8, (argb >> 24) as u8)
    }

    pub fn r(&self) -> u8 {
        self.r
    }

    pub fn g(&self) -> u8 {
        self.g
    }

    pub fn b(&self) -> u8 {
        self.b
    }

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn argb(&self) -> u32 {
        self.argb
    }

    /// Scale r, g and b by a luminance clamped to `[0, 1]`; alpha is kept
    pub fn adjust_brightness(&self, luminance: f32) -> Self {
        let l = if luminance.is_finite() {
            luminance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let scale = |c: u8| (f32::from(c) * l).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    /// Complementary colour, used to highlight a picked face
    pub fn contrast(&self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b, self.a)
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<u32> for Colour {
    fn from(argb: u32) -> Self {
        Self::from_argb(argb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing() {
        assert_eq!(Colour::RED.argb(), 0xFFFF_0000);
        assert_eq!(Colour::INDIGO.argb(), 0xFF4B_0082);
        assert_eq!(Colour::new(1, 2, 3, 4).argb(), 0x0401_0203);
        assert_eq!(Colour::from_argb(0x8010_2030), Colour::new(0x10, 0x20, 0x30, 0x80));
    }

    #[test]
    fn test_adjust_brightness() {
        let c = Colour::rgb(200, 100, 50);
        assert_eq!(c.adjust_brightness(0.5), Colour::rgb(100, 50, 25));
        assert_eq!(c.adjust_brightness(1.5), c);
        assert_eq!(c.adjust_brightness(-1.0), Colour::BLACK);
        assert_eq!(c.adjust_brightness(f32::NAN), Colour::BLACK);
    }

    #[test]
    fn test_contrast() {
        assert_eq!(Colour::RED.contrast(), Colour::rgb(0, 255, 255));
        assert_eq!(Colour::WHITE.contrast().contrast(), Colour::WHITE);
    }

    #[test]
    fn test_serde() {
        let c: Colour = serde_json::from_str(r#"{"r":10,"g":20,"b":30}"#).unwrap();
        assert_eq!(c.argb(), 0xFF0A_141E);
        let back = serde_json::to_string(&c).unwrap();
        assert_eq!(back, r#"{"r":10,"g":20,"b":30,"a":255}"#);
    }
}

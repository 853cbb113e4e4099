use nalgebra::Vector3;
use rand::Rng;

/// An RGB color with channels in [0, 1].
///
/// Colors are plain values: they are built once (from RGB, HSL or a hex
/// literal) and attached to vertices, faces or materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as f32 / 255.0,
            ((hex >> 8) & 0xFF) as f32 / 255.0,
            (hex & 0xFF) as f32 / 255.0,
        )
    }

    /// Builds a color from hue, saturation and lightness, all in [0, 1].
    ///
    /// The hue wraps around, saturation and lightness are clamped.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::rgb(l, l, l);
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;

        Self::rgb(
            hue_to_channel(q, p, h + 1.0 / 3.0),
            hue_to_channel(q, p, h),
            hue_to_channel(q, p, h - 1.0 / 3.0),
        )
    }

    /// Three independent uniform channels.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::rgb(rng.random(), rng.random(), rng.random())
    }

    pub fn to_vector(self) -> Vector3<f32> {
        Vector3::new(self.r, self.g, self.b)
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }
}

impl From<Color> for Vector3<f32> {
    fn from(c: Color) -> Self {
        c.to_vector()
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Converts linear RGB to sRGB (Gamma Correction).
pub fn linear_to_srgb(color: Vector3<f32>) -> Vector3<f32> {
    let gamma = 1.0 / 2.2;
    Vector3::new(
        color.x.max(0.0).powf(gamma),
        color.y.max(0.0).powf(gamma),
        color.z.max(0.0).powf(gamma),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hsl_primaries() {
        let red = Color::from_hsl(0.0, 1.0, 0.5);
        assert_relative_eq!(red.r, 1.0, epsilon = 1e-6);
        assert_relative_eq!(red.g, 0.0, epsilon = 1e-6);
        assert_relative_eq!(red.b, 0.0, epsilon = 1e-6);

        let green = Color::from_hsl(1.0 / 3.0, 1.0, 0.5);
        assert_relative_eq!(green.g, 1.0, epsilon = 1e-6);
        assert_relative_eq!(green.r, 0.0, epsilon = 1e-6);

        let blue = Color::from_hsl(2.0 / 3.0, 1.0, 0.5);
        assert_relative_eq!(blue.b, 1.0, epsilon = 1e-6);
        assert_relative_eq!(blue.g, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn hsl_grey_and_wrap() {
        let grey = Color::from_hsl(0.3, 0.0, 0.25);
        assert_eq!(grey, Color::rgb(0.25, 0.25, 0.25));

        let a = Color::from_hsl(0.1, 0.9, 0.4);
        let b = Color::from_hsl(1.1, 0.9, 0.4);
        assert_relative_eq!(a.r, b.r, epsilon = 1e-5);
        assert_relative_eq!(a.g, b.g, epsilon = 1e-5);
        assert_relative_eq!(a.b, b.b, epsilon = 1e-5);
    }

    #[test]
    fn hex_literals() {
        assert_eq!(Color::from_hex(0xff0000), Color::RED);
        assert_eq!(Color::from_hex(0x0000ff), Color::BLUE);
        let grey = Color::from_hex(0x808080);
        assert_relative_eq!(grey.g, 128.0 / 255.0);
    }
}

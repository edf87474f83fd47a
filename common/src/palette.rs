use crate::models::Palette;

/// An sRGB colour as red, green and blue channels.

pub type Rgb = (u8, u8, u8);

impl Palette {

    /// The light, middle and dark stops of this palette's sequential scale.

    pub fn stops(&self) -> [Rgb; 3] {
        match *self {
            Palette::Blues => [(0xf7, 0xfb, 0xff), (0x6b, 0xae, 0xd6), (0x08, 0x30, 0x6b)],
            Palette::Greens => [(0xf7, 0xfc, 0xf5), (0x74, 0xc4, 0x76), (0x00, 0x44, 0x1b)],
            Palette::Reds => [(0xff, 0xf5, 0xf0), (0xfb, 0x6a, 0x4a), (0x67, 0x00, 0x0d)],
            Palette::Purples => [(0xfc, 0xfb, 0xfd), (0x9e, 0x9a, 0xc8), (0x3f, 0x00, 0x7d)],
            Palette::Oranges => [(0xff, 0xf5, 0xeb), (0xfd, 0x8d, 0x3c), (0x7f, 0x27, 0x04)],
            Palette::Greys => [(0xff, 0xff, 0xff), (0x96, 0x96, 0x96), (0x00, 0x00, 0x00)],
        }
    }

    /// Picks the colour for `value` on a scale running from zero to `max`.
    /// Values outside the scale are clamped to its ends.

    pub fn colour(&self, value: f64, max: f64) -> Rgb {
        let t = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
        let [light, mid, dark] = self.stops();
        if t <= 0.5 {
            lerp(light, mid, t * 2.0)
        } else {
            lerp(mid, dark, (t - 0.5) * 2.0)
        }
    }
}

fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let channel = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    (channel(a.0, b.0), channel(a.1, b.1), channel(a.2, b.2))
}

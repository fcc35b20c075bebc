/// Color with channels in `0.0..=255.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(255.0, 255.0, 255.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen::<f32>()*255.0,
            g: rng.gen::<f32>()*255.0,
            b: rng.gen::<f32>()*255.0,
        }
    }

    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            r: self.r+(to.r-self.r)*t,
            g: self.g+(to.g-self.g)*t,
            b: self.b+(to.b-self.b)*t,
        }
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

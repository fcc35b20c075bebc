use glam::Vec2;
use rand::{rngs::StdRng, Rng};

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::config::LightningSettings;
use crate::effect::Effect;
use crate::error::Result;

const TRAIL_COLOR: Rgb = Rgb::new(10.0, 10.0, 10.0);

/// One jagged stroke from the top edge to the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Bolt {
    pub points: Vec<Vec2>,
    pub alpha: f32,
    pub line_width: f32,
}

#[derive(Debug, Clone)]
pub struct Lightning {
    settings: LightningSettings,
}

impl Lightning {
    pub fn new(settings: LightningSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Rolls for a strike this frame and, on success, generates the bolt.
    pub fn strike<R: Rng + ?Sized>(&self, rng: &mut R, width: f32, height: f32) -> Option<Bolt> {
        if !rng.gen_bool(self.settings.strike_probability) {
            return None;
        }
        Some(self.bolt(rng, width, height))
    }

    pub fn bolt<R: Rng + ?Sized>(&self, rng: &mut R, width: f32, height: f32) -> Bolt {
        let s = &self.settings;
        let alpha = uniform(rng, s.min_alpha, s.max_alpha);
        let line_width = uniform(rng, s.min_width, s.max_width);

        let mut point = Vec2::new(uniform(rng, 0.0, width), 0.0);
        let mut points = vec![point];
        while point.y < height {
            point.x += uniform(rng, -s.jitter, s.jitter);
            point.y += uniform(rng, s.min_step, s.max_step);
            points.push(point);
        }

        Bolt { points, alpha, line_width }
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min+rng.gen::<f32>()*(max-min)
}

/// Occasional white bolts over a slowly fading dark background.
pub struct LightningEffect {
    lightning: Lightning,
    trail_alpha: f32,
    rng: StdRng,
}

impl LightningEffect {
    pub fn new(settings: LightningSettings, rng: StdRng) -> Result<Self> {
        Ok(Self {
            trail_alpha: settings.trail_alpha,
            lightning: Lightning::new(settings)?,
            rng,
        })
    }
}

impl Effect for LightningEffect {
    fn name(&self) -> &'static str {
        "lightning"
    }

    fn frame(&mut self, canvas: &mut Canvas) {
        canvas.fade(TRAIL_COLOR, self.trail_alpha);

        let (width, height) = (canvas.width() as f32, canvas.height() as f32);
        if let Some(bolt) = self.lightning.strike(&mut self.rng, width, height) {
            log::trace!("bolt with {} points", bolt.points.len());
            canvas.stroke_polyline(&bolt.points, bolt.line_width, Rgb::WHITE, bolt.alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::SeedableRng;

    fn lightning(probability: f64) -> Lightning {
        Lightning::new(LightningSettings {
            strike_probability: probability,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn probability_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let never = lightning(0.0);
        let always = lightning(1.0);
        for _ in 0..200 {
            assert!(never.strike(&mut rng, 800.0, 600.0).is_none());
            assert!(always.strike(&mut rng, 800.0, 600.0).is_some());
        }
    }

    #[test]
    fn bolt_spans_top_to_bottom() {
        let mut rng = StdRng::seed_from_u64(10);
        let bolt = lightning(1.0).bolt(&mut rng, 800.0, 600.0);
        assert_eq!(bolt.points[0].y, 0.0);
        assert!((0.0..800.0).contains(&bolt.points[0].x));
        assert!(bolt.points.last().unwrap().y >= 600.0);
        assert!(bolt.points[bolt.points.len()-2].y < 600.0);
        assert!((0.1..0.4).contains(&bolt.alpha));
        assert!((1.0..3.0).contains(&bolt.line_width));
        for pair in bolt.points.windows(2) {
            let step = pair[1]-pair[0];
            assert!(step.x.abs() <= 20.0);
            assert!((10.0..=50.0).contains(&step.y));
        }
    }

    #[test]
    fn effect_fades_toward_trail_color() {
        let mut canvas = Canvas::new(40, 40);
        let mut effect = LightningEffect::new(
            LightningSettings {
                strike_probability: 0.0,
                trail_alpha: 1.0,
                ..Default::default()
            },
            StdRng::seed_from_u64(11),
        )
        .unwrap();
        effect.frame(&mut canvas);
        assert_eq!(canvas.pixel(20, 20), Some([10, 10, 10, 255]));
    }

    #[test]
    fn effect_draws_bolt() {
        let mut canvas = Canvas::new(60, 200);
        let mut effect = LightningEffect::new(
            LightningSettings {
                strike_probability: 1.0,
                trail_alpha: 0.0,
                min_alpha: 1.0,
                max_alpha: 1.0,
                ..Default::default()
            },
            StdRng::seed_from_u64(12),
        )
        .unwrap();
        effect.frame(&mut canvas);
        let lit = canvas.as_bytes().chunks(4).filter(|px| px[0] == 255).count();
        assert!(lit > 0);
    }

    #[test]
    fn rejects_settings_that_would_panic_or_hang() {
        let out_of_range = LightningSettings {
            strike_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(Lightning::new(out_of_range), Err(Error::InvalidConfig(_))));

        let stalled = LightningSettings {
            min_step: 0.0,
            max_step: 0.0,
            ..Default::default()
        };
        assert!(matches!(Lightning::new(stalled.clone()), Err(Error::InvalidConfig(_))));
        assert!(matches!(
            LightningEffect::new(stalled, StdRng::seed_from_u64(13)),
            Err(Error::InvalidConfig(_))
        ));
    }
}

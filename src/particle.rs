use glam::Vec2;
use rand::Rng;

use crate::color::Rgb;

pub const DEFAULT_CLOSE_ENOUGH: f32 = 100.0;

/// A single point of the swarm, steered toward a target pixel.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub target: Vec2,
    /// Radius inside which the particle slows down proportionally.
    pub close_enough: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub size: f32,
    pub killed: bool,
    pub start_color: Rgb,
    pub target_color: Rgb,
    pub color_weight: f32,
    pub color_blend_rate: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            target: Vec2::ZERO,
            close_enough: DEFAULT_CLOSE_ENOUGH,
            max_speed: 1.0,
            max_force: 0.1,
            size: 10.0,
            killed: false,
            start_color: Rgb::BLACK,
            target_color: Rgb::BLACK,
            color_weight: 0.0,
            color_blend_rate: 0.01,
        }
    }
}

impl Particle {
    /// Spawns a particle just outside the canvas with randomized motion and
    /// blend parameters.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        let max_speed = rng.gen::<f32>()*6.0+4.0;
        Self {
            pos: off_canvas_point(rng, width, height),
            max_speed,
            max_force: max_speed*0.05,
            size: rng.gen::<f32>()*6.0+6.0,
            color_blend_rate: rng.gen::<f32>()*0.0275+0.0025,
            ..Default::default()
        }
    }

    /// Advances one frame: steers toward the target, integrates, and moves
    /// the color blend forward.
    pub fn step(&mut self) {
        let to_target = self.target-self.pos;
        let distance = to_target.length();
        let proximity = if distance < self.close_enough {
            distance/self.close_enough
        } else {
            1.0
        };

        let desired = to_target.normalize_or_zero()*self.max_speed*proximity;
        let steer = (desired-self.vel).clamp_length_max(self.max_force);
        self.acc += steer;

        self.vel = (self.vel+self.acc).clamp_length_max(self.max_speed);
        self.pos += self.vel;
        self.acc = Vec2::ZERO;

        if self.color_weight < 1.0 {
            self.color_weight = (self.color_weight+self.color_blend_rate).min(1.0);
        }
    }

    pub fn current_color(&self) -> Rgb {
        self.start_color.lerp(self.target_color, self.color_weight)
    }

    /// Points the particle at a new pixel and starts blending toward `color`
    /// from wherever the current blend left off.
    pub fn retarget(&mut self, target: Vec2, color: Rgb) {
        self.killed = false;
        self.start_color = self.current_color();
        self.target_color = color;
        self.color_weight = 0.0;
        self.target = target;
    }

    /// Sends the particle off-canvas and fades it to black. No-op if already
    /// killed.
    pub fn kill<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f32, height: f32) {
        if self.killed {
            return;
        }
        self.target = off_canvas_point(rng, width, height);
        self.start_color = self.current_color();
        self.target_color = Rgb::BLACK;
        self.color_weight = 0.0;
        self.killed = true;
    }

    pub fn is_out_of_bounds(&self, width: f32, height: f32) -> bool {
        self.pos.x < 0.0 || self.pos.x > width || self.pos.y < 0.0 || self.pos.y > height
    }
}

/// Picks a point at distance `(width + height) / 2` from the canvas center,
/// in the direction of a random on-canvas point. That distance is at least
/// the half-diagonal, so the point is never inside the canvas.
pub fn off_canvas_point<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Vec2 {
    let center = Vec2::new(width/2.0, height/2.0);
    let toward = Vec2::new(rng.gen::<f32>()*width, rng.gen::<f32>()*height);
    let direction = (toward-center).try_normalize().unwrap_or(Vec2::X);
    center+direction*((width+height)/2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn moves_toward_target() {
        let mut p = Particle {
            target: Vec2::new(500.0, 0.0),
            max_speed: 5.0,
            max_force: 0.5,
            ..Default::default()
        };
        for _ in 0..20 {
            p.step();
        }
        assert!(p.pos.x > 0.0);
        assert!(p.pos.y.abs() < 1e-4);
    }

    #[test]
    fn speed_and_force_are_clamped() {
        let mut p = Particle {
            vel: Vec2::new(-40.0, 12.0),
            target: Vec2::new(1000.0, 1000.0),
            max_speed: 4.0,
            max_force: 0.2,
            ..Default::default()
        };
        p.step();
        assert!(p.vel.length() <= 4.0+1e-4);
    }

    #[test]
    fn settles_on_target() {
        let mut p = Particle {
            pos: Vec2::new(40.0, 40.0),
            target: Vec2::new(60.0, 45.0),
            max_speed: 6.0,
            max_force: 0.3,
            ..Default::default()
        };
        for _ in 0..2000 {
            p.step();
        }
        assert!(p.pos.distance(p.target) < 1.0);
    }

    #[test]
    fn color_weight_caps_at_one() {
        let mut p = Particle {
            color_blend_rate: 0.3,
            target_color: Rgb::WHITE,
            ..Default::default()
        };
        for _ in 0..5 {
            p.step();
        }
        assert_eq!(p.color_weight, 1.0);
        assert_eq!(p.current_color(), Rgb::WHITE);
    }

    #[test]
    fn retarget_rebases_color() {
        let mut p = Particle {
            target_color: Rgb::new(200.0, 100.0, 0.0),
            color_weight: 0.5,
            killed: true,
            ..Default::default()
        };
        p.retarget(Vec2::new(3.0, 4.0), Rgb::WHITE);
        assert!(!p.killed);
        assert_eq!(p.start_color, Rgb::new(100.0, 50.0, 0.0));
        assert_eq!(p.target_color, Rgb::WHITE);
        assert_eq!(p.color_weight, 0.0);
        assert_eq!(p.target, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn kill_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut p = Particle {
            target_color: Rgb::WHITE,
            color_weight: 1.0,
            ..Default::default()
        };
        p.kill(&mut rng, 800.0, 600.0);
        let target = p.target;
        assert!(p.killed);
        assert_eq!(p.start_color, Rgb::WHITE);
        assert_eq!(p.target_color, Rgb::BLACK);

        p.kill(&mut rng, 800.0, 600.0);
        assert_eq!(p.target, target);
    }

    #[test]
    fn off_canvas_points_are_outside() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let point = off_canvas_point(&mut rng, 640.0, 480.0);
            let p = Particle { pos: point, ..Default::default() };
            assert!(p.is_out_of_bounds(640.0, 480.0), "{:?} is on the canvas", point);
        }
    }
}

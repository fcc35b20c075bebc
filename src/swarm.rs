use glam::Vec2;
use rand::{rngs::StdRng, seq::SliceRandom, Rng};
use serde::Deserialize;

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::config::ParticleSettings;
use crate::effect::{Effect, PointerButton, PointerEvent};
use crate::error::Result;
use crate::glyphs::TextMask;
use crate::particle::Particle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawStyle {
    /// 2x2 squares.
    #[default]
    Points,
    /// Discs of each particle's own diameter.
    Circles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetargetSummary {
    pub reused: usize,
    pub spawned: usize,
    pub killed: usize,
}

/// Flat list of independent particles plus the bounds they live in.
#[derive(Debug, Clone)]
pub struct ParticleSwarm {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
}

impl ParticleSwarm {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            particles: Vec::new(),
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
    }

    /// Reassigns the swarm to the lit pixels of `mask`. Existing particles
    /// are reused first, new ones spawn off-canvas for the remainder, and
    /// any particles left over are killed.
    pub fn retarget<R: Rng + ?Sized>(&mut self, mask: &TextMask, stride: usize, rng: &mut R) -> RetargetSummary {
        let mut coords = mask.lit_coordinates(stride);
        coords.shuffle(rng);
        let color = Rgb::random(rng);

        let existing = self.particles.len();
        let mut summary = RetargetSummary::default();
        for (i, coord) in coords.iter().enumerate() {
            if i < existing {
                summary.reused += 1;
            } else {
                self.particles.push(Particle::spawn(rng, self.width, self.height));
                summary.spawned += 1;
            }
            self.particles[i].retarget(*coord, color);
        }

        for particle in self.particles.iter_mut().skip(coords.len()) {
            if !particle.killed {
                summary.killed += 1;
            }
            particle.kill(rng, self.width, self.height);
        }
        summary
    }

    /// Moves every particle one frame, then drops killed particles that have
    /// left the canvas.
    pub fn step(&mut self) {
        for particle in &mut self.particles {
            particle.step();
        }
        let (width, height) = (self.width, self.height);
        let before = self.particles.len();
        self.particles.retain(|p| !(p.killed && p.is_out_of_bounds(width, height)));
        let removed = before-self.particles.len();
        if removed > 0 {
            log::trace!("pruned {} particles", removed);
        }
    }

    /// Kills every particle within `radius` of `point`.
    pub fn disperse<R: Rng + ?Sized>(&mut self, point: Vec2, radius: f32, rng: &mut R) -> usize {
        let (width, height) = (self.width, self.height);
        let mut count = 0;
        for particle in &mut self.particles {
            if !particle.killed && particle.pos.distance(point) < radius {
                particle.kill(rng, width, height);
                count += 1;
            }
        }
        count
    }

    pub fn draw(&self, canvas: &mut Canvas, style: DrawStyle) {
        for particle in &self.particles {
            let color = particle.current_color();
            match style {
                DrawStyle::Points => canvas.fill_rect(particle.pos.x, particle.pos.y, 2.0, 2.0, color),
                DrawStyle::Circles => canvas.fill_circle(particle.pos, particle.size/2.0, color),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Pointer {
    at: Vec2,
    pressed: bool,
    secondary: bool,
}

/// Cycles through a word list, morphing the swarm into each word in turn.
pub struct ParticleTextEffect {
    settings: ParticleSettings,
    swarm: ParticleSwarm,
    word_index: usize,
    frame_count: u64,
    pointer: Pointer,
    width: u32,
    height: u32,
    rng: StdRng,
}

impl ParticleTextEffect {
    /// Sets up the swarm and shows the first word.
    pub fn new(settings: ParticleSettings, width: u32, height: u32, rng: StdRng) -> Result<Self> {
        settings.validate()?;
        let mut effect = Self {
            settings,
            swarm: ParticleSwarm::new(width, height),
            word_index: 0,
            frame_count: 0,
            pointer: Pointer::default(),
            width,
            height,
            rng,
        };
        effect.show_word(0);
        Ok(effect)
    }

    pub fn swarm(&self) -> &ParticleSwarm {
        &self.swarm
    }

    pub fn current_word(&self) -> Option<&str> {
        self.settings.words.get(self.word_index).map(String::as_str)
    }

    pub fn next_word(&mut self) {
        if self.settings.words.is_empty() {
            return;
        }
        let next = (self.word_index+1)%self.settings.words.len();
        self.show_word(next);
    }

    fn show_word(&mut self, index: usize) {
        let Some(word) = self.settings.words.get(index) else {
            log::warn!("no word at index {}", index);
            return;
        };
        self.word_index = index;
        let mask = TextMask::render(word, self.width, self.height);
        let summary = self.swarm.retarget(&mask, self.settings.pixel_stride, &mut self.rng);
        log::debug!(
            "word {:?}: reused {}, spawned {}, killed {}",
            word,
            summary.reused,
            summary.spawned,
            summary.killed
        );
    }
}

impl Effect for ParticleTextEffect {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn frame(&mut self, canvas: &mut Canvas) {
        canvas.fade(Rgb::BLACK, self.settings.trail_alpha);

        self.swarm.step();
        self.swarm.draw(canvas, self.settings.draw_style);

        if self.pointer.pressed && self.pointer.secondary {
            self.swarm.disperse(self.pointer.at, self.settings.disperse_radius, &mut self.rng);
        }

        self.frame_count += 1;
        if self.frame_count%self.settings.frames_per_word == 0 {
            self.next_word();
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.swarm.resize(width, height);
    }

    fn pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Pressed { button, at } => {
                self.pointer.pressed = true;
                self.pointer.secondary = button == PointerButton::Secondary;
                self.pointer.at = at;
            }
            PointerEvent::Moved { at } => self.pointer.at = at,
            PointerEvent::Released => {
                self.pointer.pressed = false;
                self.pointer.secondary = false;
            }
        }
    }
}

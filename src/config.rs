use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::swarm::DrawStyle;

pub const DEFAULT_WORDS: [&str; 4] = ["DATA", "VISUALIZATION", "BY", "ADOUNIA"];

/// Runtime settings, loaded from an optional TOML file. Every field has a
/// default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frames per second the window loop is capped at.
    pub frame_rate: u32,
    pub particles: ParticleSettings,
    pub lightning: LightningSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            particles: ParticleSettings::default(),
            lightning: LightningSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub words: Vec<String>,
    /// Sampling step over the flattened glyph pixels.
    pub pixel_stride: usize,
    pub draw_style: DrawStyle,
    pub frames_per_word: u64,
    pub disperse_radius: f32,
    pub trail_alpha: f32,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
            pixel_stride: 6,
            draw_style: DrawStyle::Points,
            frames_per_word: 240,
            disperse_radius: 50.0,
            trail_alpha: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightningSettings {
    pub strike_probability: f64,
    pub trail_alpha: f32,
    /// Maximum horizontal offset per segment, either direction.
    pub jitter: f32,
    pub min_step: f32,
    pub max_step: f32,
    pub min_alpha: f32,
    pub max_alpha: f32,
    pub min_width: f32,
    pub max_width: f32,
}

impl Default for LightningSettings {
    fn default() -> Self {
        Self {
            strike_probability: 0.05,
            trail_alpha: 0.1,
            jitter: 20.0,
            min_step: 10.0,
            max_step: 50.0,
            min_alpha: 0.1,
            max_alpha: 0.4,
            min_width: 1.0,
            max_width: 3.0,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies `particles` subcommand flags over the loaded settings. An
    /// empty word list keeps the configured words.
    pub fn apply_particle_overrides(&mut self, words: &[String], circles: bool, stride: Option<usize>) -> Result<()> {
        if !words.is_empty() {
            self.particles.words = words.to_vec();
        }
        if circles {
            self.particles.draw_style = DrawStyle::Circles;
        }
        if let Some(stride) = stride {
            self.particles.pixel_stride = stride;
        }
        self.validate()
    }

    pub fn apply_lightning_overrides(&mut self, probability: Option<f64>) -> Result<()> {
        if let Some(probability) = probability {
            self.lightning.strike_probability = probability;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(Error::InvalidConfig("frame_rate must be positive".into()));
        }
        self.particles.validate()?;
        self.lightning.validate()
    }
}

impl ParticleSettings {
    pub fn validate(&self) -> Result<()> {
        if self.words.is_empty() {
            return Err(Error::InvalidConfig("word list is empty".into()));
        }
        if self.pixel_stride == 0 {
            return Err(Error::InvalidConfig("pixel_stride must be at least 1".into()));
        }
        if self.frames_per_word == 0 {
            return Err(Error::InvalidConfig("frames_per_word must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.trail_alpha) {
            return Err(Error::InvalidConfig(format!(
                "particles.trail_alpha {} is outside 0..=1",
                self.trail_alpha
            )));
        }
        Ok(())
    }
}

impl LightningSettings {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.strike_probability) {
            return Err(Error::InvalidConfig(format!(
                "strike_probability {} is outside 0..=1",
                self.strike_probability
            )));
        }
        if !(0.0..=1.0).contains(&self.trail_alpha) {
            return Err(Error::InvalidConfig(format!(
                "lightning.trail_alpha {} is outside 0..=1",
                self.trail_alpha
            )));
        }
        if self.min_step <= 0.0 || self.min_step > self.max_step {
            return Err(Error::InvalidConfig(format!(
                "step range {}..{} must be positive and ordered",
                self.min_step, self.max_step
            )));
        }
        if self.jitter < 0.0 || self.min_alpha > self.max_alpha || self.min_width > self.max_width {
            return Err(Error::InvalidConfig("lightning ranges must be ordered".into()));
        }
        Ok(())
    }
}

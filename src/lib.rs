//! Two decorative canvas animations: a particle swarm that morphs into
//! successive words, and a procedural lightning flicker.

pub mod canvas;
pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod glyphs;
pub mod lightning;
pub mod particle;
pub mod swarm;

pub use canvas::Canvas;
pub use color::Rgb;
pub use config::Config;
pub use effect::{Effect, PointerButton, PointerEvent};
pub use error::{Error, Result};
pub use lightning::{Bolt, Lightning, LightningEffect};
pub use particle::Particle;
pub use swarm::{DrawStyle, ParticleSwarm, ParticleTextEffect};

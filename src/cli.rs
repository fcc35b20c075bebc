use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "word-storm")]
#[command(about = "Decorative particle text and lightning animations", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config file; built-in defaults are used when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for the random generator, for reproducible runs
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Morph a particle swarm through a list of words
    Particles {
        /// Words to cycle through, overriding the config
        words: Vec<String>,

        /// Draw particles as discs instead of points
        #[arg(long)]
        circles: bool,

        /// Sampling stride over the rendered glyph pixels
        #[arg(long)]
        stride: Option<usize>,
    },

    /// Flicker procedural lightning bolts
    Lightning {
        /// Chance of a bolt on each frame
        #[arg(long)]
        probability: Option<f64>,
    },
}

impl Cli {
    /// Base log filter from `-v`/`-q`. `-v` wins over `-q`.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 if self.quiet => log::LevelFilter::Error,
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    fn level(args: &[&str]) -> LevelFilter {
        Cli::try_parse_from(args).unwrap().log_level()
    }

    #[test]
    fn verbosity_flags_pick_level() {
        assert_eq!(level(&["word-storm", "lightning"]), LevelFilter::Warn);
        assert_eq!(level(&["word-storm", "-q", "lightning"]), LevelFilter::Error);
        assert_eq!(level(&["word-storm", "-v", "lightning"]), LevelFilter::Info);
        assert_eq!(level(&["word-storm", "particles", "-vv"]), LevelFilter::Debug);
        assert_eq!(level(&["word-storm", "-vvvv", "particles", "HI"]), LevelFilter::Trace);
    }
}

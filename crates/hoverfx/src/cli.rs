//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use hoverfx_config::Config;
use hoverfx_core::AnimationSpeed;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal page with cosmos and stock ticker hover animations", long_about = None)]
pub struct Cli {
    /// Config file to load instead of the default location.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write logs.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Seed for reproducible scenes.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Target redraw rate.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Animation speed: slow, medium or fast.
    #[arg(long)]
    pub speed: Option<AnimationSpeed>,
}

impl Cli {
    /// Let command line flags take precedence over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(fps) = self.fps {
            config.display.fps = fps;
        }
        if let Some(speed) = self.speed {
            config.display.speed = speed;
        }
        if let Some(path) = &self.log_file {
            config.logging.file = Some(path.clone());
        }
    }
}

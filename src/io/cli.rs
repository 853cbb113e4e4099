use crate::error::Result;
use crate::io::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Renders procedural scenes to image files.
#[derive(Parser, Debug, Default)]
#[command(name = "scenegen", version)]
#[command(about = "Procedural 3D scenes rendered by a software rasterizer")]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Scene to build, see --list
    #[arg(short, long)]
    pub scene: Option<String>,

    /// Seed for every random choice
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of frames to render
    #[arg(short, long)]
    pub frames: Option<usize>,

    /// Output image path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,

    /// List the available scenes and exit
    #[arg(long)]
    pub list: bool,

    /// Report scene size without rendering
    #[arg(long)]
    pub stats: bool,
}

impl Cli {
    /// The `--config` file (or the defaults) with the flags applied,
    /// validated once.
    pub fn load_config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        self.resolve(config)
    }

    pub fn resolve(&self, mut config: Config) -> Result<Config> {
        self.apply(&mut config);
        config.validate()
    }

    /// Flags take precedence over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(scene) = &self.scene {
            config.scene.kind = scene.clone();
        }
        if let Some(seed) = self.seed {
            config.scene.seed = Some(seed);
        }
        if let Some(frames) = self.frames {
            config.render.frames = frames;
        }
        if let Some(output) = &self.output {
            config.render.output = output.clone();
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from(["scenegen", "--scene", "helix", "--seed", "7", "-f", "3", "--width", "320"])
            .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.scene.kind, "helix");
        assert_eq!(config.scene.seed, Some(7));
        assert_eq!(config.render.frames, 3);
        assert_eq!(config.render.width, 320);
        assert_eq!(config.render.height, 600);
    }

    #[test]
    fn flags_repair_the_file_before_validation() {
        let file = Config::from_toml("[render]\nwidth = 0\n").unwrap();

        let cli = Cli::try_parse_from(["scenegen", "--width", "320"]).unwrap();
        let config = cli.resolve(file.clone()).unwrap();
        assert_eq!(config.render.width, 320);

        let bare = Cli::try_parse_from(["scenegen"]).unwrap();
        assert!(bare.resolve(file).is_err());
    }
}

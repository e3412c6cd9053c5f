use crate::config::{BatchConfig, ConversionConfig, FILE_NAME, MAX_DIMENSION};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Render SVG documents to PNG images.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file.
    #[arg(long, global = true, default_value = FILE_NAME)]
    pub config: PathBuf,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert SVG files, packing the results into an archive if there is more than one.
    Convert(ConvertArgs),

    /// Render a single SVG document from a file or stdin.
    Render(RenderArgs),

    /// Check that SVG files are well formed and report their size.
    Check(CheckArgs),

    /// Print an example SVG document.
    Example,

    /// Write a JSON schema for the config file.
    GenerateConfigSchema,
}

#[derive(Args, Clone, Default)]
pub struct ConversionArgs {
    /// Output width in pixels.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION as i64))]
    pub width: Option<u32>,

    /// Output height in pixels.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION as i64))]
    pub height: Option<u32>,

    /// Encoder quality hint between 0 and 1.
    #[arg(long)]
    pub quality: Option<f32>,

    /// Multiplier applied after width and height are resolved.
    #[arg(long)]
    pub scale: Option<f32>,

    /// Leave the background transparent instead of filling it with white.
    #[arg(long)]
    pub transparent_background: Option<bool>,

    /// Keep the document's aspect ratio when only one of width and height is given.
    #[arg(long)]
    pub maintain_aspect_ratio: Option<bool>,
}

impl ConversionArgs {
    /// Overrides the config values that were given on the command line.
    pub fn apply(&self, config: &mut ConversionConfig) {
        if self.width.is_some() {
            config.width = self.width;
        }
        if self.height.is_some() {
            config.height = self.height;
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(transparent) = self.transparent_background {
            config.transparent_background = transparent;
        }
        if let Some(maintain) = self.maintain_aspect_ratio {
            config.maintain_aspect_ratio = maintain;
        }
    }
}

#[derive(Args, Clone)]
pub struct ConvertArgs {
    /// SVG files or directories containing them.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Where to write the image or archive.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Name of the archive written when more than one image is produced.
    #[arg(long)]
    pub archive_name: Option<String>,

    /// How many documents to convert at the same time.
    #[arg(long)]
    pub group_size: Option<usize>,

    #[command(flatten)]
    pub conversion: ConversionArgs,
}

impl ConvertArgs {
    pub fn apply(&self, batch: &mut BatchConfig) {
        if let Some(ref archive_name) = self.archive_name {
            batch.archive_name = archive_name.clone();
        }
        if let Some(group_size) = self.group_size {
            batch.group_size = group_size;
        }
    }
}

#[derive(Args, Clone)]
pub struct RenderArgs {
    /// The SVG file to render. Reads stdin when absent or `-`.
    pub input: Option<PathBuf>,

    /// Where to write the PNG.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub conversion: ConversionArgs,
}

#[derive(Args, Clone)]
pub struct CheckArgs {
    /// SVG files or directories containing them.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "svgpng",
            "convert",
            "a.svg",
            "--width",
            "200",
            "--transparent-background",
            "false",
            "--group-size",
            "2",
        ]);

        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };

        let mut conversion = ConversionConfig {
            height: Some(50),
            ..Default::default()
        };
        args.conversion.apply(&mut conversion);

        assert_eq!(conversion.width, Some(200));
        assert_eq!(conversion.height, Some(50));
        assert!(!conversion.transparent_background);
        assert!(conversion.maintain_aspect_ratio);

        let mut batch = BatchConfig::default();
        args.apply(&mut batch);
        assert_eq!(batch.group_size, 2);
    }

    #[test]
    fn oversized_width_is_rejected() {
        let result = Cli::try_parse_from(["svgpng", "convert", "a.svg", "--width", "10001"]);
        assert!(result.is_err());
    }
}

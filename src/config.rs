use crate::{batch::DEFAULT_GROUP_SIZE, convert::ConversionRequest, package::DEFAULT_ARCHIVE_NAME};
use anyhow::{bail, Context};
use fs_err::tokio as fs;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{io::ErrorKind, path::Path};

pub const FILE_NAME: &str = "svgpng.toml";

pub const MAX_DIMENSION: u32 = 10_000;
pub const MAX_SCALE: f32 = 10.0;

#[derive(Debug, Deserialize, Serialize, Clone, Default, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Config {
    /// Reads the config at `path`. A missing file means defaults.
    pub async fn read(path: &Path) -> anyhow::Result<Config> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(err) => return Err(err).context("Failed to read config file"),
        };

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.conversion.validate()?;
        self.batch.validate()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConversionConfig {
    /// Output width in pixels. Defaults to the document's own width.
    pub width: Option<u32>,
    /// Output height in pixels. Defaults to the document's own height.
    pub height: Option<u32>,
    /// Encoder quality hint between 0 and 1.
    #[serde(default = "default_quality")]
    pub quality: f32,
    #[serde(default = "default_true")]
    pub transparent_background: bool,
    /// Multiplier applied after width and height are resolved.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Derive the missing dimension from the document's aspect ratio when
    /// only one of width and height is set.
    #[serde(default = "default_true")]
    pub maintain_aspect_ratio: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            quality: default_quality(),
            transparent_background: true,
            scale: default_scale(),
            maintain_aspect_ratio: true,
        }
    }
}

impl ConversionConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if let Some(value) = value {
                if !(1..=MAX_DIMENSION).contains(&value) {
                    bail!("{name} must be between 1 and {MAX_DIMENSION}, got {value}");
                }
            }
        }

        if !(0.0..=1.0).contains(&self.quality) {
            bail!("quality must be between 0 and 1, got {}", self.quality);
        }

        if !(self.scale > 0.0 && self.scale <= MAX_SCALE) {
            bail!(
                "scale must be greater than 0 and at most {MAX_SCALE}, got {}",
                self.scale
            );
        }

        Ok(())
    }

    pub fn request(&self) -> ConversionRequest {
        ConversionRequest {
            width: self.width.map(|width| width as f32),
            height: self.height.map(|height| height as f32),
            quality: Some(self.quality),
            transparent_background: Some(self.transparent_background),
            scale: Some(self.scale),
            maintain_aspect_ratio: Some(self.maintain_aspect_ratio),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// How many documents are converted at the same time.
    #[serde(default = "default_group_size")]
    pub group_size: usize,
    /// Files past this count are skipped.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Files larger than this many bytes are skipped.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// File name of the archive written when more than one image is produced.
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            group_size: default_group_size(),
            max_files: default_max_files(),
            max_file_size: default_max_file_size(),
            archive_name: default_archive_name(),
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.group_size == 0 {
            bail!("group_size must be at least 1");
        }

        if self.max_files == 0 {
            bail!("max_files must be at least 1");
        }

        if self.archive_name.trim().is_empty() {
            bail!("archive_name must not be empty");
        }

        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_quality() -> f32 {
    1.0
}

fn default_scale() -> f32 {
    1.0
}

fn default_group_size() -> usize {
    DEFAULT_GROUP_SIZE
}

fn default_max_files() -> usize {
    20
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_archive_name() -> String {
    DEFAULT_ARCHIVE_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::{prelude::*, TempDir};

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::read(&dir.path().join(FILE_NAME)).await.unwrap();

        assert_eq!(config.conversion, ConversionConfig::default());
        assert_eq!(config.batch, BatchConfig::default());
        assert_eq!(config.batch.group_size, 3);
        assert_eq!(config.batch.max_files, 20);
        assert_eq!(config.batch.max_file_size, 10_485_760);
    }

    #[tokio::test]
    async fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let file = dir.child(FILE_NAME);
        file.write_str(
            r#"
            [conversion]
            width = 256
            transparent_background = false

            [batch]
            group_size = 5
            "#,
        )
        .unwrap();

        let config = Config::read(file.path()).await.unwrap();

        assert_eq!(config.conversion.width, Some(256));
        assert!(!config.conversion.transparent_background);
        assert_eq!(config.conversion.scale, 1.0);
        assert_eq!(config.batch.group_size, 5);
        assert_eq!(config.batch.archive_name, DEFAULT_ARCHIVE_NAME);
    }

    #[tokio::test]
    async fn out_of_range_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.child(FILE_NAME);
        file.write_str("[conversion]\nquality = 1.5\n").unwrap();

        let err = Config::read(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("quality"));
    }

    #[tokio::test]
    async fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.child(FILE_NAME);
        file.write_str("[conversion]\ncolour = \"red\"\n").unwrap();

        assert!(Config::read(file.path()).await.is_err());
    }

    #[test]
    fn bounds() {
        let mut conversion = ConversionConfig {
            width: Some(MAX_DIMENSION + 1),
            ..Default::default()
        };
        assert!(conversion.validate().is_err());

        conversion.width = Some(MAX_DIMENSION);
        assert!(conversion.validate().is_ok());

        conversion.scale = 0.0;
        assert!(conversion.validate().is_err());

        let batch = BatchConfig {
            group_size: 0,
            ..Default::default()
        };
        assert!(batch.validate().is_err());
    }

    #[test]
    fn request_carries_every_field() {
        let conversion = ConversionConfig {
            width: Some(64),
            ..Default::default()
        };

        assert_eq!(
            conversion.request(),
            ConversionRequest {
                width: Some(64.0),
                height: None,
                quality: Some(1.0),
                transparent_background: Some(true),
                scale: Some(1.0),
                maintain_aspect_ratio: Some(true),
            }
        );
    }
}

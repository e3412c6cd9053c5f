use crate::{
    cli::RenderArgs,
    config::Config,
    convert::{Rasterizer, SourceDocument},
    package::png_file_name,
};
use anyhow::Context;
use fs_err::tokio as fs;
use log::info;
use std::path::{Path, PathBuf};
use tokio::io::{stdin, AsyncReadExt};

/// Name used for documents that don't come from a file.
const CODE_FILE_NAME: &str = "code-generated.svg";

pub async fn render(args: RenderArgs, mut config: Config) -> anyhow::Result<()> {
    args.conversion.apply(&mut config.conversion);
    config.conversion.validate()?;

    let (name, text) = match args.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            let text = fs::read_to_string(path)
                .await
                .context("Failed to read SVG file")?;

            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| CODE_FILE_NAME.to_string());

            (name, text)
        }
        _ => {
            let mut text = String::new();
            stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read SVG from stdin")?;

            (CODE_FILE_NAME.to_string(), text)
        }
    };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(png_file_name(&name)));

    let rasterizer = Rasterizer::with_system_fonts();
    let converted = rasterizer
        .rasterize(&SourceDocument::new(text), &config.conversion.request())
        .await
        .with_context(|| format!("Failed to render {name}"))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(&output, &converted.png)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Rendered {name} at {} (source {}) to {}",
        converted.output_size,
        converted.original_size,
        output.display()
    );

    Ok(())
}

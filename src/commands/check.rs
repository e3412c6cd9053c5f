use crate::{
    cli::CheckArgs,
    convert::{resolve, validate, Size, ValidationError},
    intake,
};
use anyhow::bail;
use fs_err::tokio as fs;
use log::{info, warn};

fn inspect(text: &str) -> Result<Size, ValidationError> {
    validate(text)?;
    Ok(resolve(text))
}

pub async fn check(args: CheckArgs) -> anyhow::Result<()> {
    let files = intake::expand(&args.inputs)
        .into_iter()
        .filter(|path| intake::is_svg(path))
        .collect::<Vec<_>>();

    if files.is_empty() {
        bail!("No SVG files found");
    }

    let mut invalid = 0;
    for path in &files {
        let text = match fs::read_to_string(path).await {
            Ok(text) => text,
            Err(err) => {
                warn!("{}: Failed to read file: {err}", path.display());
                invalid += 1;
                continue;
            }
        };

        match inspect(&text) {
            Ok(size) => info!("{}: {size}", path.display()),
            Err(err) => {
                warn!("{}: {err}", path.display());
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        bail!("{invalid} of {} files are invalid", files.len());
    }

    info!("All {} files are valid", files.len());

    Ok(())
}

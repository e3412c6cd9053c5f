use crate::{
    batch::{self, ItemStatus},
    cli::ConvertArgs,
    config::Config,
    convert::Rasterizer,
    intake, package,
    progress_bar::ProgressBar,
    util::format_file_size,
};
use anyhow::bail;
use console::style;
use indicatif::MultiProgress;
use log::{info, warn};
use std::rc::Rc;

pub async fn convert(
    args: ConvertArgs,
    mut config: Config,
    multi_progress: MultiProgress,
) -> anyhow::Result<()> {
    args.conversion.apply(&mut config.conversion);
    args.apply(&mut config.batch);
    config.validate()?;

    let intake = intake::collect(&args.inputs, &config.batch).await;
    for rejection in &intake.rejected {
        warn!("Skipping {}: {}", rejection.path.display(), rejection.reason);
    }

    let mut items = intake.items;
    if items.is_empty() {
        bail!("No SVG files to convert");
    }

    for item in &items {
        if let Some(err) = item.error() {
            warn!("Skipping {}: {err}", item.name());
        }
    }

    let queued = items
        .iter()
        .filter(|item| item.status() == ItemStatus::Ready)
        .count();

    let rasterizer = Rc::new(Rasterizer::with_system_fonts());
    let mut pb = ProgressBar::new(&multi_progress, "Converting", queued);

    batch::convert_batch(
        &mut items,
        &config.conversion.request(),
        rasterizer,
        config.batch.group_size,
        |item| match item.status() {
            ItemStatus::Converting => pb.set_msg(item.name()),
            ItemStatus::Completed => pb.settled(true),
            ItemStatus::Error => {
                warn!(
                    "Failed to convert {}: {}",
                    item.name(),
                    item.error().unwrap_or_default()
                );
                pb.settled(false);
            }
            ItemStatus::Ready => {}
        },
    )
    .await;

    pb.finish();

    let failed = items
        .iter()
        .filter(|item| item.status() == ItemStatus::Error)
        .count();

    let outputs = batch::successful_outputs(&items);
    let converted = outputs.len();

    if let Some(artifact) = package::package(outputs, &config.batch.archive_name).await? {
        let path = artifact.write(&args.output_dir).await?;
        info!(
            "Wrote {} ({})",
            path.display(),
            format_file_size(artifact.data().len() as u64)
        );
    }

    if converted == 0 {
        bail!("None of the {failed} files could be converted");
    }

    if failed > 0 {
        info!(
            "Converted {} files, {} failed",
            style(converted).green(),
            style(failed).red()
        );
    } else {
        info!("Converted {} files", style(converted).green());
    }

    Ok(())
}

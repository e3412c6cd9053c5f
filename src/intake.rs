use crate::{
    batch::BatchItem, config::BatchConfig, convert::SourceDocument, util::format_file_size,
};
use fs_err::tokio as fs;
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file that was left out of the batch, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct Intake {
    pub items: Vec<BatchItem>,
    pub rejected: Vec<Rejection>,
}

/// Expands directories (recursively, sorted by name) into the files they
/// contain. Plain files are kept in the order given.
pub fn expand(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            files.extend(
                WalkDir::new(input)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|entry| entry.file_type().is_file())
                    .map(|entry| entry.into_path()),
            );
        } else {
            files.push(input.clone());
        }
    }

    files
}

pub fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Builds batch items from `inputs`, enforcing the file type, per-file size
/// and file count limits. Earlier files win when the count limit is hit.
pub async fn collect(inputs: &[PathBuf], limits: &BatchConfig) -> Intake {
    let mut intake = Intake::default();

    for path in expand(inputs) {
        let reject = |reason: String| Rejection {
            path: path.clone(),
            reason,
        };

        if !is_svg(&path) {
            intake.rejected.push(reject("not an SVG file".to_string()));
            continue;
        }

        let len = match fs::metadata(&path).await {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                intake.rejected.push(reject(err.to_string()));
                continue;
            }
        };

        if len > limits.max_file_size {
            intake.rejected.push(reject(format!(
                "larger than {}",
                format_file_size(limits.max_file_size)
            )));
            continue;
        }

        if intake.items.len() >= limits.max_files {
            intake.rejected.push(reject(format!(
                "over the {} file limit",
                limits.max_files
            )));
            continue;
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!("Reading {} ({})", path.display(), format_file_size(len));

        let item = match fs::read_to_string(&path).await {
            Ok(text) => BatchItem::new(name, SourceDocument::new(text)),
            Err(err) => BatchItem::failed(name, format!("Failed to read file: {err}")),
        };
        intake.items.push(item);
    }

    intake
}

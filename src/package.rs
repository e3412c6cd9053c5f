use anyhow::Context;
use fs_err::tokio as fs;
use std::{
    collections::HashMap,
    io::{Cursor, Write},
    path::{Path, PathBuf},
};
use tokio::task;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

pub const DEFAULT_ARCHIVE_NAME: &str = "converted-images.zip";

/// One converted image, ready to be written out.
#[derive(Debug, Clone)]
pub struct Output {
    pub file_name: String,
    pub png: Vec<u8>,
}

/// What the user ends up downloading.
#[derive(Debug)]
pub enum Artifact {
    Single(Output),
    Archive { file_name: String, data: Vec<u8> },
}

impl Artifact {
    pub fn file_name(&self) -> &str {
        match self {
            Artifact::Single(output) => &output.file_name,
            Artifact::Archive { file_name, .. } => file_name,
        }
    }

    pub fn data(&self) -> &[u8] {
        match self {
            Artifact::Single(output) => &output.png,
            Artifact::Archive { data, .. } => data,
        }
    }

    pub async fn write(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let path = dir.join(self.file_name());
        fs::write(&path, self.data())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path)
    }
}

/// `icon.svg` becomes `icon.png`.
pub fn png_file_name(source_name: &str) -> String {
    Path::new(source_name)
        .with_extension("png")
        .to_string_lossy()
        .into_owned()
}

/// One output is handed back as is. Two or more are zipped together. None
/// yields nothing.
pub async fn package(
    mut outputs: Vec<Output>,
    archive_name: &str,
) -> anyhow::Result<Option<Artifact>> {
    match outputs.len() {
        0 => Ok(None),
        1 => Ok(outputs.pop().map(Artifact::Single)),
        _ => {
            let data = task::spawn_blocking(move || build_archive(outputs))
                .await
                .context("Archive task failed")??;

            Ok(Some(Artifact::Archive {
                file_name: archive_name.to_string(),
                data,
            }))
        }
    }
}

fn build_archive(outputs: Vec<Output>) -> anyhow::Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    // PNG data is already deflated.
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut taken = HashMap::<String, usize>::new();
    for output in outputs {
        let entry_name = unique_name(&mut taken, &output.file_name);

        writer
            .start_file(entry_name.as_str(), options)
            .with_context(|| format!("Failed to add {entry_name} to archive"))?;
        writer.write_all(&output.png)?;
    }

    let cursor = writer.finish().context("Failed to finish archive")?;
    Ok(cursor.into_inner())
}

/// A ZIP can't hold the same name twice, so repeats get `-2`, `-3`, ...
fn unique_name(taken: &mut HashMap<String, usize>, name: &str) -> String {
    let count = taken.entry(name.to_string()).or_insert(0);
    *count += 1;

    if *count == 1 {
        return name.to_string();
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let renamed = match path.extension() {
        Some(ext) => format!("{stem}-{count}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{count}"),
    };

    // The renamed entry could itself collide with a real file name.
    if taken.contains_key(&renamed) {
        return unique_name(taken, name);
    }
    taken.insert(renamed.clone(), 1);
    renamed
}

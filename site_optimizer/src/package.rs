use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::info;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("{} not found, run `site-optimizer build` first", .0.display())]
    MissingOutput(PathBuf),
    #[error("package destination {} is inside the directory being archived", .0.display())]
    DestinationInsideOutput(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Debug, Clone)]
pub struct PackageSummary {
    pub path: PathBuf,
    pub files: usize,
    pub bytes: u64,
}

pub fn archive_name(prefix: &str) -> String {
    format!("{}_{}.zip", prefix, Local::now().format("%Y%m%d_%H%M%S"))
}

/// Archive entry name for `path`: relative to `base`, `/`-separated.
fn entry_name(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// True when `path` is `dir` or lies below it.
fn is_within(path: &Path, dir: &Path) -> bool {
    match (path.canonicalize(), dir.canonicalize()) {
        (Ok(path), Ok(dir)) => path.starts_with(dir),
        _ => path.starts_with(dir),
    }
}

/// Zips every file under `output_dir` into `destination/{prefix}_{timestamp}.zip`.
pub fn create_package(
    output_dir: &Path,
    destination: &Path,
    prefix: &str,
) -> Result<PackageSummary, PackageError> {
    if !output_dir.is_dir() {
        return Err(PackageError::MissingOutput(output_dir.to_path_buf()));
    }
    if is_within(destination, output_dir) {
        return Err(PackageError::DestinationInsideOutput(
            destination.to_path_buf(),
        ));
    }
    fs::create_dir_all(destination)?;
    let path = destination.join(archive_name(prefix));
    info!(archive = %path.display(), "creating deployment package");

    let mut zip = ZipWriter::new(File::create(&path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut files = 0;
    for entry in WalkDir::new(output_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry_name(output_dir, entry.path()) else {
            continue;
        };
        zip.start_file(name, options)?;
        io::copy(&mut File::open(entry.path())?, &mut zip)?;
        files += 1;
    }
    zip.finish()?;

    let bytes = fs::metadata(&path)?.len();
    info!(files, bytes, "deployment package written");
    Ok(PackageSummary { path, files, bytes })
}

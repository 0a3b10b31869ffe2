use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::css_minifier::minify_css;
use crate::html::{extract_first_script, minify_html, rewrite_stylesheet_link, splice_script};
use crate::js_minifier::minify_js;
use crate::obfuscator::{ObfuscationError, Obfuscator, ProtectedNames};
use crate::protection::inject_protection;
use crate::report::{BuildReport, SizeStats};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("missing source file {}: {source}", path.display())]
    MissingSource { path: PathBuf, source: io::Error },
    #[error("io error at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("refusing to wipe {}: output directory contains the project root", .0.display())]
    OutputContainsProjectRoot(PathBuf),
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("obfuscation error: {0}")]
    Obfuscation(#[from] ObfuscationError),
    #[error("stylesheet link pattern error: {0}")]
    LinkPattern(#[from] regex::Error),
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_source(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|source| BuildError::MissingSource {
        path: path.to_path_buf(),
        source,
    })
}

/// True when `dir` is `path` or one of its ancestors.
fn contains_path(dir: &Path, path: &Path) -> bool {
    match (dir.canonicalize(), path.canonicalize()) {
        (Ok(dir), Ok(path)) => path.starts_with(dir),
        _ => path.starts_with(dir),
    }
}

/// Copies `src` into `dst` recursively, creating `dst`.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, BuildError> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| BuildError::Io {
                path: entry.path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, e),
            })?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_at(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(io_at(&target))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Produces the production build described by `config` and reports what it
/// did. The output directory is wiped first; nothing is cleaned up if a step
/// fails halfway.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport, BuildError> {
    let root = &config.project_root;
    let out_dir = config.output_path();
    info!(root = %root.display(), output = %out_dir.display(), "starting production build");

    if contains_path(&out_dir, root) {
        return Err(BuildError::OutputContainsProjectRoot(out_dir));
    }
    if out_dir.exists() {
        fs::remove_dir_all(&out_dir).map_err(io_at(&out_dir))?;
    }
    fs::create_dir_all(&out_dir).map_err(io_at(&out_dir))?;

    let mut copied_assets = Vec::new();
    for dir in &config.asset_dirs {
        let src = root.join(dir);
        if !src.is_dir() {
            debug!(dir = %dir, "asset directory not present, skipping");
            continue;
        }
        let files = copy_dir_recursive(&src, &out_dir.join(dir))?;
        info!(dir = %dir, files, "copied asset directory");
        copied_assets.push(dir.clone());
    }

    info!("minifying CSS");
    let css_path = config.source_path(&config.css_file);
    let css = read_source(&css_path)?;
    let minified_css = minify_css(&css);
    let css_out = out_dir.join(&config.minified_css_file);
    fs::write(&css_out, &minified_css).map_err(io_at(&css_out))?;

    info!("processing HTML");
    let html_path = config.source_path(&config.html_file);
    let source_html = read_source(&html_path)?;
    let mut html = source_html.clone();

    let mut renamed_identifiers = 0;
    let script_obfuscated = match extract_first_script(&html) {
        Some(script) => {
            info!("obfuscating inline script");
            let protected = ProtectedNames::new(config.protected_names.iter().cloned());
            let obfuscated = Obfuscator::new(protected).obfuscate(&script.content)?;
            renamed_identifiers = obfuscated.identifiers.len();
            let minified_js = minify_js(&obfuscated.code);
            html = splice_script(&html, &script, &minified_js);
            true
        }
        None => {
            debug!("no inline script found, skipping obfuscation");
            false
        }
    };

    html = rewrite_stylesheet_link(&html, &config.css_file, &config.minified_css_file)?;

    info!("adding code protection");
    html = inject_protection(&html);

    info!("minifying HTML");
    html = minify_html(&html);

    let html_out = out_dir.join(&config.html_file);
    fs::write(&html_out, &html).map_err(io_at(&html_out))?;

    let mut copied_aux_files = Vec::new();
    for name in &config.aux_files {
        let src = root.join(name);
        if !src.is_file() {
            debug!(file = %name, "auxiliary file not present, skipping");
            continue;
        }
        let dst = out_dir.join(name);
        fs::copy(&src, &dst).map_err(io_at(&dst))?;
        copied_aux_files.push(name.clone());
    }

    let report = BuildReport {
        output_dir: out_dir,
        css: SizeStats::new(css.len() as u64, minified_css.len() as u64),
        html: SizeStats::new(source_html.len() as u64, html.len() as u64),
        script_obfuscated,
        renamed_identifiers,
        copied_assets,
        copied_aux_files,
    };
    info!(
        css_reduction = report.css.reduction_percent(),
        html_reduction = report.html.reduction_percent(),
        "production build complete"
    );
    Ok(report)
}

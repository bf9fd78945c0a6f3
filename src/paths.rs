use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use retouch_core::io::is_supported_extension;

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_supported_extension)
}

/// Turn user input into an absolute path.
///
/// Bare names resolve against `cwd` and a leading `~` expands to the home
/// directory. The path does not have to exist.
pub fn expand_path(input: &str, cwd: &Path) -> Result<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        bail!("no path entered");
    }

    let expanded = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            let home = dirs::home_dir().context("cannot expand ~: no home directory")?;
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(input),
    };
    Ok(if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    })
}

/// Like [`expand_path`], but the result must be an existing image file.
pub fn resolve_image_path(input: &str, cwd: &Path) -> Result<PathBuf> {
    let path = expand_path(input, cwd)?;
    if !path.is_file() {
        bail!("file not found: {}", path.display());
    }
    if !has_image_extension(&path) {
        bail!(
            "not an image file (expected jpg, jpeg, png, bmp, gif, tif or tiff): {}",
            path.display()
        );
    }
    Ok(path)
}

/// Image files directly inside `dir`, sorted by name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

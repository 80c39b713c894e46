// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! File exporters.
//!
//! Downloads in the original sense: `flow.json` is the raw editor text,
//! `diagram.svg` the latest rendered SVG, `diagram.png` that SVG rasterized
//! at its intrinsic size. All writes go through a temp file and a rename so
//! a crash never leaves a half-written export, and an existing symlink at
//! the target is refused rather than followed.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

pub const EXPORT_JSON_FILE_NAME: &str = "flow.json";
pub const EXPORT_SVG_FILE_NAME: &str = "diagram.svg";
pub const EXPORT_PNG_FILE_NAME: &str = "diagram.png";

#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: io::Error },
    SymlinkRefused { path: PathBuf },
    InvalidSvg { message: String },
    PixmapAllocation { width: u32, height: u32 },
    PngEncode { message: String },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
            Self::InvalidSvg { message } => write!(f, "invalid svg: {message}"),
            Self::PixmapAllocation { width, height } => {
                write!(f, "cannot allocate a {width}x{height} pixmap")
            }
            Self::PngEncode { message } => write!(f, "png encoding failed: {message}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Writes the raw editor text to `flow.json` in `export_dir`.
///
/// The text is written verbatim whether or not it is valid JSON; the export
/// mirrors what the editor shows.
pub fn export_json(export_dir: &Path, source: &str) -> Result<PathBuf, ExportError> {
    let path = export_dir.join(EXPORT_JSON_FILE_NAME);
    write_atomic(&path, source.as_bytes())?;
    debug!(path = %path.display(), bytes = source.len(), "exported json");
    Ok(path)
}

/// Writes the rendered SVG document to `diagram.svg` in `export_dir`.
pub fn export_svg(export_dir: &Path, svg: &str) -> Result<PathBuf, ExportError> {
    let path = export_dir.join(EXPORT_SVG_FILE_NAME);
    write_atomic(&path, svg.as_bytes())?;
    debug!(path = %path.display(), bytes = svg.len(), "exported svg");
    Ok(path)
}

/// Rasterizes the SVG and writes `diagram.png` in `export_dir`.
pub fn export_png(export_dir: &Path, svg: &str) -> Result<PathBuf, ExportError> {
    let png = rasterize_svg_to_png(svg)?;
    let path = export_dir.join(EXPORT_PNG_FILE_NAME);
    write_atomic(&path, &png)?;
    debug!(path = %path.display(), bytes = png.len(), "exported png");
    Ok(path)
}

/// Rasterizes an SVG document to PNG bytes at its intrinsic size.
///
/// Also feeds the clipboard copy, which never touches the filesystem.
pub fn rasterize_svg_to_png(svg: &str) -> Result<Vec<u8>, ExportError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|err| ExportError::InvalidSvg { message: err.to_string() })?;

    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height()).ok_or(
        ExportError::PixmapAllocation { width: size.width(), height: size.height() },
    )?;
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| ExportError::PngEncode { message: err.to_string() })
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(ExportError::SymlinkRefused { path: path.to_path_buf() });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(ExportError::Io { path: path.to_path_buf(), source }),
    }

    let Some(parent) = path.parent() else {
        return Err(ExportError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };
    let Some(file_name) = path.file_name() else {
        return Err(ExportError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path =
        parent.join(format!(".proteus.tmp.{}.{}", file_name.to_string_lossy(), nanos));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| ExportError::Io { path: tmp_path.clone(), source })?;
    if let Err(source) = file.write_all(contents) {
        drop(file);
        let _ = fs::remove_file(&tmp_path);
        return Err(ExportError::Io { path: tmp_path.clone(), source });
    }
    if let Err(source) = file.sync_all() {
        drop(file);
        let _ = fs::remove_file(&tmp_path);
        return Err(ExportError::Io { path: tmp_path.clone(), source });
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(ExportError::Io { path: path.to_path_buf(), source });
    }

    #[cfg(unix)]
    {
        let dir = fs::File::open(parent)
            .map_err(|source| ExportError::Io { path: parent.to_path_buf(), source })?;
        dir.sync_all()
            .map_err(|source| ExportError::Io { path: parent.to_path_buf(), source })?;
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

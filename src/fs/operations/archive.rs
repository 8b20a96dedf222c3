//! Folder packaging for folder uploads.
//!
//! The tree is walked in file-name order and every entry gets the same fixed
//! timestamp and permissions, so an unmodified tree always produces the same
//! bytes. Subdirectories are written as explicit `name/` entries, which keeps
//! empty directories in the archive. Symlinks are not followed and are left out.

use std::fs::File;
use std::io::{self, BufWriter, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::utils::relative_entry_name;
use crate::error::{OpenfilesError, Result};

const FILE_PERMISSIONS: u32 = 0o644;
const DIR_PERMISSIONS: u32 = 0o755;

fn entry_options(permissions: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(permissions)
}

fn zip_error(err: ZipError) -> OpenfilesError {
    OpenfilesError::Transfer(format!("Archive error: {}", err))
}

fn io_error(path: &Path, err: io::Error) -> OpenfilesError {
    OpenfilesError::Transfer(format!("Failed to read {}: {}", path.display(), err))
}

/// Write a ZIP archive of `folder` into `writer` and hand the writer back.
///
/// Entry names are relative to `folder` (the folder itself is not a prefix).
///
/// # Example
/// ```no_run
/// use std::io::Cursor;
/// use std::path::Path;
///
/// # fn example() -> openfiles::Result<()> {
/// let bytes = openfiles::write_archive(Path::new("photos"), Cursor::new(Vec::new()))?.into_inner();
/// println!("{} bytes", bytes.len());
/// # Ok(())
/// # }
/// ```
pub fn write_archive<W: Write + Seek>(folder: &Path, writer: W) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let mut files = 0usize;
    let mut dirs = 0usize;

    let walker = WalkDir::new(folder)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            OpenfilesError::Transfer(format!("Failed to walk {}: {}", folder.display(), e))
        })?;
        let path = entry.path();
        let Some(name) = relative_entry_name(folder, path) else {
            continue;
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            zip.add_directory(name, entry_options(DIR_PERMISSIONS))
                .map_err(zip_error)?;
            dirs += 1;
        } else if file_type.is_file() {
            let mut source = File::open(path).map_err(|e| io_error(path, e))?;
            zip.start_file(name, entry_options(FILE_PERMISSIONS))
                .map_err(zip_error)?;
            io::copy(&mut source, &mut zip).map_err(|e| io_error(path, e))?;
            files += 1;
        } else {
            debug!(path = %path.display(), "Skipping non-regular entry");
        }
    }

    debug!(folder = %folder.display(), files, dirs, "Archive written");
    zip.finish().map_err(zip_error)
}

/// Package `folder` into a temporary file, removed when the handle is dropped.
pub(crate) fn archive_to_tempfile(folder: &Path) -> Result<NamedTempFile> {
    let mut temp = tempfile::Builder::new()
        .prefix("openfiles-")
        .suffix(".zip")
        .tempfile()
        .map_err(|e| OpenfilesError::Transfer(format!("Failed to create temp archive: {}", e)))?;

    let mut writer = write_archive(folder, BufWriter::new(temp.as_file_mut()))?;
    writer
        .flush()
        .map_err(|e| OpenfilesError::Transfer(format!("Failed to write archive: {}", e)))?;
    drop(writer);

    Ok(temp)
}

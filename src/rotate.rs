//! In-place 180-degree rotation of grid files, for exports
//! taken with an upside-down sensor mount.
//!
//! Rotation rewrites the file. Applying it twice restores
//! the original cells, so callers must make sure each file
//! is rotated only once.
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, warn};

use crate::error::{Error, Result};

/// Rotate the grid in `path` by 180 degrees: row order and
/// the cells within every row are reversed. The result is
/// written back to `path` with the same delimiter.
///
/// Rows are not required to have equal lengths; ragged
/// grids are only rejected when loaded as a
/// [`Frame`](crate::grid::Frame).
pub fn rotate_file_180<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    let rows = read_rows(path, delimiter)?;
    replace_via_scratch(path, |tmp| write_rows(tmp, delimiter, rotated_180(rows)))?;
    debug!("rotated {}", path.display());
    Ok(())
}

/// Let `write` fill a scratch file next to `path`, then
/// move it over `path`. The scratch file is removed if
/// either step fails, leaving `path` untouched.
fn replace_via_scratch<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let tmp = scratch_path(path);
    let result = write(&tmp).and_then(|()| fs::rename(&tmp, path).map_err(Error::io(path)));
    if result.is_err() && tmp.exists() {
        if let Err(e) = fs::remove_file(&tmp) {
            warn!("cannot remove {}: {}", tmp.display(), e);
        }
    }
    result
}

/// Reverse row order and cell order within each row.
pub fn rotated_180(rows: Vec<StringRecord>) -> Vec<StringRecord> {
    rows.into_iter()
        .rev()
        .map(|row| row.iter().rev().collect())
        .collect()
}

fn read_rows(path: &Path, delimiter: u8) -> Result<Vec<StringRecord>> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(Error::csv(path))?
        .into_records()
        .collect::<Result<_, _>>()
        .map_err(Error::csv(path))
}

fn write_rows(path: &Path, delimiter: u8, rows: Vec<StringRecord>) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(Error::csv(path))?;
    for row in &rows {
        writer.write_record(row).map_err(Error::csv(path))?;
    }
    writer.flush().map_err(Error::io(path))
}

fn scratch_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".rotating");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_grid(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!(
            "irzones_rotate_{}_{}",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn rotates_file_in_place() {
        let path = temp_grid("once.csv", "1;2;3\n4;5;6\n");
        rotate_file_180(&path, b';').unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "6;5;4\n3;2;1\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rotating_twice_restores_cells() {
        let original = "1.5;2;3;\n4;5;6;\n7;8;9;\n";
        let path = temp_grid("twice.csv", original);
        rotate_file_180(&path, b';').unwrap();
        assert_ne!(fs::read_to_string(&path).unwrap(), original);
        rotate_file_180(&path, b';').unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn ragged_rows_are_rotated() {
        let rows = vec![
            StringRecord::from(vec!["1", "2"]),
            StringRecord::from(vec!["3"]),
        ];
        let rotated = rotated_180(rows);
        assert_eq!(rotated[0], StringRecord::from(vec!["3"]));
        assert_eq!(rotated[1], StringRecord::from(vec!["2", "1"]));
    }

    #[test]
    fn failed_write_leaves_no_scratch_file() {
        let path = temp_grid("failed.csv", "1;2\n3;4\n");
        let result = replace_via_scratch(&path, |tmp| {
            fs::write(tmp, "2;1\n").map_err(Error::io(tmp))?;
            Err(Error::Configuration("disk full".into()))
        });

        assert!(matches!(result, Err(Error::Configuration(_))));
        assert!(!scratch_path(&path).exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "1;2\n3;4\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn failed_rename_leaves_no_scratch_file() {
        let dir = env::temp_dir().join(format!("irzones_rotate_{}_rename", std::process::id()));
        let target = dir.join("occupied");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("x"), "").unwrap();

        // a non-empty directory cannot be replaced by a file
        let result = replace_via_scratch(&target, |tmp| write_rows(tmp, b';', vec![]));
        assert!(matches!(result, Err(Error::Io { .. })));
        assert!(!scratch_path(&target).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rotation_leaves_no_scratch_file() {
        let path = temp_grid("clean.csv", "1;2\n");
        rotate_file_180(&path, b';').unwrap();
        assert!(!scratch_path(&path).exists());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_error() {
        let path = env::temp_dir().join("irzones_rotate_missing.csv");
        assert!(rotate_file_180(&path, b';').is_err());
    }
}

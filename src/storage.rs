use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use spdlog::prelude::*;

use crate::error::{AllowlistError, Result};

const TEMP_SUFFIX: &str = ".part";

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

// `path` is only ever replaced by rename, never truncated in place.
pub fn write(path: &Path, data: &str) -> Result<()> {
    trace!(
        "storage: write {} len={}",
        path.to_string_lossy(),
        data.len()
    );
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(AllowlistError::io(parent))?;
    }

    let temp = temp_path(path);
    fs::write(&temp, data).map_err(AllowlistError::io(&temp))?;
    if let Err(err) = fs::rename(&temp, path) {
        if let Err(cleanup) = fs::remove_file(&temp) {
            warn!(
                "storage: cannot remove {}: {}",
                temp.to_string_lossy(),
                cleanup
            );
        }
        return Err(AllowlistError::io(path)(err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parents_and_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("allowlist.txt");

        write(&path, "https://a.com\nhttps://b.com\n").unwrap();
        write(&path, "https://c.com\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "https://c.com\n");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn temp_path_is_a_sibling() {
        assert_eq!(
            temp_path(Path::new("lists/allowlist.txt")),
            PathBuf::from("lists/allowlist.txt.part")
        );
    }

    #[test]
    fn failed_rename_keeps_target_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory cannot be replaced by a file
        let path = dir.path().join("allowlist.txt");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let err = write(&path, "https://a.com\n").unwrap_err();

        assert!(matches!(err, AllowlistError::Io { .. }));
        assert!(path.join("keep").exists());
        assert!(!temp_path(&path).exists());
    }
}

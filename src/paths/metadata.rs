use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::error::{AssetError, Result};

/// Modification time of `path` in whole seconds since the Unix epoch.
pub fn modification_time(path: &Path) -> Result<i64> {
  let modified = fs::metadata(path)
    .and_then(|metadata| metadata.modified())
    .map_err(|err| AssetError::unreadable(path, err))?;

  Ok(match modified.duration_since(UNIX_EPOCH) {
    Ok(elapsed) => elapsed.as_secs() as i64,
    Err(before) => -(before.duration().as_secs() as i64),
  })
}

/// Read the full content of `path`.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
  fs::read(path).map_err(|err| AssetError::unreadable(path, err))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;
  use std::time::{Duration, SystemTime};
  use tempfile::tempdir;

  #[test]
  fn reads_modification_time_in_seconds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.css");
    fs::write(&path, "body {}").unwrap();

    let stamp = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    fs::File::options()
      .write(true)
      .open(&path)
      .unwrap()
      .set_modified(stamp)
      .unwrap();

    assert_eq!(modification_time(&path).unwrap(), 1_700_000_000);
  }

  #[test]
  fn recent_files_have_positive_timestamps() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.js");
    fs::write(&path, "").unwrap();

    let now = SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .unwrap()
      .as_secs() as i64;
    let mtime = modification_time(&path).unwrap();
    assert!(mtime > 0 && mtime <= now + 1);
  }

  #[test]
  fn missing_files_are_unreadable() {
    let dir = tempdir().unwrap();
    let err = modification_time(&dir.path().join("missing.css")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnreadableFile);

    let err = read_file(&dir.path().join("missing.css")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnreadableFile);
  }
}

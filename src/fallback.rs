//! Per-site fallback files for statuses the cluster could not accept.

use crate::error::Result;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const FALLBACK_FILE_PREFIX: &str = ".crm_attribute.";
const FALLBACK_STAGE_PREFIX: &str = ".crm_attribute.stage.";

/// Owns the fallback-file lifecycle for every site under one directory.
///
/// A record is a single line `"<key> = <value>"` holding the latest status
/// that could not be published to the cluster. The resource agent polls
/// the file during its monitor operation, so a reader must never observe
/// a partial write: content is staged to a sibling file and released with
/// an atomic rename. No locks are taken; rename ordering decides the
/// winner if two writers race on the same site.
#[derive(Debug, Clone)]
pub struct FallbackStore {
  dir: PathBuf,
}

impl FallbackStore {
  pub fn new(dir: impl AsRef<Path>) -> Self {
    Self {
      dir: dir.as_ref().to_path_buf(),
    }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn file_path(&self, site: &str) -> PathBuf {
    self.dir.join(format!("{FALLBACK_FILE_PREFIX}{site}"))
  }

  pub fn stage_path(&self, site: &str) -> PathBuf {
    self.dir.join(format!("{FALLBACK_STAGE_PREFIX}{site}"))
  }

  /// Durably record `"<key> = <value>"` for a site, superseding any
  /// previous record. Interrupting the process mid-write leaves either
  /// the old complete content or the new complete content in place.
  pub fn record(&self, site: &str, key: &str, value: &str) -> Result<()> {
    let stage_path = self.stage_path(site);
    let file_path = self.file_path(site);

    let mut stage_file = OpenOptions::new()
      .create(true)
      .truncate(true)
      .write(true)
      .open(&stage_path)?;
    stage_file.write_all(format!("{key} = {value}").as_bytes())?;
    stage_file.sync_all()?;

    fs::rename(&stage_path, &file_path)?;
    sync_dir(&self.dir)?;

    info!(path = %file_path.display(), "replication status recorded in fallback file");
    Ok(())
  }

  /// Delete a site's fallback record if one exists. Missing files are the
  /// common case and not an error.
  pub fn clear(&self, site: &str) -> Result<bool> {
    match fs::remove_file(self.file_path(site)) {
      Ok(()) => Ok(true),
      Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
      Err(error) => Err(error.into()),
    }
  }

  /// Current record for a site, if any. This is the read the resource
  /// agent performs.
  pub fn read(&self, site: &str) -> Result<Option<String>> {
    match fs::read_to_string(self.file_path(site)) {
      Ok(content) => Ok(Some(content)),
      Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
      Err(error) => Err(error.into()),
    }
  }
}

fn sync_dir(dir: &Path) -> Result<()> {
  #[cfg(unix)]
  {
    let directory = File::open(dir)?;
    directory.sync_all()?;
  }

  #[cfg(not(unix))]
  {
    let _ = dir;
  }

  Ok(())
}

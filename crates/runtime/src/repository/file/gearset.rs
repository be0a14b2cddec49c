//! File-based GearsetRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use gear_core::{Gearset, GearsetId, gearset_from_json, gearset_to_json};

use crate::repository::{GearsetRepository, RepositoryError, Result};

/// File-based implementation of GearsetRepository.
///
/// # File Format
///
/// Each gearset is stored as `gearset_{id}.json` using the tagged JSON codec
/// from `gear_core::persistence`. Writes go to a temp file first and are
/// renamed into place.
pub struct FileGearsetRepository {
    base_dir: PathBuf,
}

impl FileGearsetRepository {
    /// Create a new file-based gearset repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn gearset_path(&self, id: GearsetId) -> PathBuf {
        self.base_dir.join(format!("gearset_{}.json", id))
    }

    fn is_gearset_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.starts_with("gearset_") && name.ends_with(".json"))
    }
}

impl GearsetRepository for FileGearsetRepository {
    fn save(&self, gearset: &Gearset) -> Result<()> {
        let path = self.gearset_path(gearset.id());
        let temp_path = path.with_extension("json.tmp");

        let json = gearset_to_json(gearset)?;
        fs::write(&temp_path, json).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved gearset[{}] to {}", gearset.id(), path.display());
        Ok(())
    }

    fn load(&self, id: GearsetId) -> Result<Option<Gearset>> {
        let path = self.gearset_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(RepositoryError::Io)?;
        Ok(Some(gearset_from_json(&json)?))
    }

    fn exists(&self, id: GearsetId) -> bool {
        self.gearset_path(id).exists()
    }

    fn delete(&self, id: GearsetId) -> Result<()> {
        let path = self.gearset_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted gearset[{}]", id);
        }
        Ok(())
    }

    /// Malformed files are logged and skipped; only directory-level I/O
    /// failures abort the load.
    fn load_all(&self) -> Result<Vec<Gearset>> {
        let mut gearsets = Vec::new();

        for entry in fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)? {
            let path = entry.map_err(RepositoryError::Io)?.path();
            if !Self::is_gearset_file(&path) {
                continue;
            }

            let decoded = fs::read_to_string(&path)
                .map_err(RepositoryError::Io)
                .and_then(|json| gearset_from_json(&json).map_err(RepositoryError::Codec));
            match decoded {
                Ok(gearset) => gearsets.push(gearset),
                Err(error) => tracing::warn!(
                    path = %path.display(),
                    %error,
                    "Skipping unreadable gearset file"
                ),
            }
        }

        gearsets.sort_by_key(|g| (g.source().import_order, g.id()));
        Ok(gearsets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gear_core::ClassJob;

    #[test]
    fn save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileGearsetRepository::new(dir.path()).unwrap();
        let gearset = Gearset::new("Savage", ClassJob::Pld).with_priority(1);

        repo.save(&gearset).unwrap();
        assert!(repo.exists(gearset.id()));
        assert_eq!(repo.load(gearset.id()).unwrap(), Some(gearset.clone()));

        repo.delete(gearset.id()).unwrap();
        assert!(!repo.exists(gearset.id()));
        assert_eq!(repo.load(gearset.id()).unwrap(), None);
        repo.delete(gearset.id()).unwrap();
    }

    #[test]
    fn load_all_skips_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileGearsetRepository::new(dir.path()).unwrap();
        let gearset = Gearset::new("Good", ClassJob::Whm);
        repo.save(&gearset).unwrap();

        fs::write(dir.path().join("gearset_broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let loaded = repo.load_all().unwrap();
        assert_eq!(loaded, vec![gearset]);
    }
}

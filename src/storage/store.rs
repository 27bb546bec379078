use log::warn;
use std::{fs, io, path::PathBuf};

use crate::config::{ConfigError, DashboardConfig};

use super::profile::Profile;

#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// `profiles/` under the platform config directory of meshdash.
    pub fn new() -> Result<Self, ConfigError> {
        let dir = DashboardConfig::config_dir()?.join("profiles");
        Self::at(dir.clone()).map_err(|source| ConfigError::Io { path: dir, source })
    }

    /// Use `dir` as the profile directory, creating it if needed.
    pub fn at(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Names map 1:1 onto files directly inside the profile directory.
    fn file_for(&self, name: &str) -> io::Result<PathBuf> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed == "."
            || trimmed.contains("..")
            || trimmed.contains(|c: char| c == '/' || c == '\\')
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid profile name {name:?}"),
            ));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Returns every stored profile sorted by name (silently skips malformed files).
    pub fn list(&self) -> io::Result<Vec<Profile>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            match fs::File::open(&path)
                .and_then(|f| serde_json::from_reader(f).map_err(io::Error::from))
            {
                Ok(profile) => out.push(profile),
                Err(e) => warn!("Could not read profile {:?}: {e}", path),
            }
        }
        out.sort_by(|a: &Profile, b: &Profile| a.name().cmp(b.name()));
        Ok(out)
    }

    /// Look up one profile; `Ok(None)` if it does not exist.
    pub fn load(&self, name: &str) -> io::Result<Option<Profile>> {
        match fs::File::open(self.file_for(name)?) {
            Ok(f) => serde_json::from_reader(f).map(Some).map_err(io::Error::from),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create or overwrite a profile.
    pub fn save(&self, profile: &Profile) -> io::Result<()> {
        let file = fs::File::create(self.file_for(profile.name())?)?;
        serde_json::to_writer_pretty(file, profile).map_err(io::Error::from)
    }

    /// Delete a preset (`Ok(true)` if removed, `Ok(false)` if it didn't exist).
    pub fn delete(&self, name: &str) -> io::Result<bool> {
        match fs::remove_file(self.file_for(name)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

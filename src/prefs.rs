use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, io, path::PathBuf};
use tracing::warn;

use crate::api::DEFAULT_API_BASE;
use crate::identity::Identity;

pub const API_BASE_ENV: &str = "EDUWATCH_API_BASE";

/// Everything EduWatch keeps on disk. Logging out removes the whole file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Prefs {
    pub user_id: Option<String>,
    pub api_base_url: Option<String>,
}

impl Prefs {
    pub fn identity(&self) -> Option<Identity> {
        self.user_id.as_deref().and_then(Identity::from_stored)
    }

    pub fn api_base_url(&self) -> String {
        resolve_api_base(env::var(API_BASE_ENV).ok(), self)
    }
}

/// Env override first, then the prefs file, then the hosted default.
pub fn resolve_api_base(env_value: Option<String>, prefs: &Prefs) -> String {
    env_value
        .into_iter()
        .chain(prefs.api_base_url.clone())
        .map(|url| url.trim().to_owned())
        .find(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_owned())
}

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("no config directory available for this user")]
    NoConfigDir,
    #[error("prefs I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("prefs could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub fn default_location() -> Result<Self, PrefsError> {
        let proj =
            ProjectDirs::from("com", "eduwatch", "EduWatch").ok_or(PrefsError::NoConfigDir)?;
        Ok(Self::at(proj.config_dir().join("prefs.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Missing or unreadable prefs yield the defaults.
    pub fn load(&self) -> Prefs {
        let Ok(bytes) = fs::read(&self.path) else {
            return Prefs::default();
        };
        serde_json::from_slice::<Prefs>(&bytes).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "ignoring corrupt prefs file");
            Prefs::default()
        })
    }

    pub fn save(&self, prefs: &Prefs) -> Result<(), PrefsError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(prefs)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), PrefsError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Persists `identity` unless one is already stored.
    pub fn remember_identity(&self, identity: &Identity) -> Result<Prefs, PrefsError> {
        let mut prefs = self.load();
        if prefs.identity().is_none() {
            prefs.user_id = Some(identity.as_str().to_owned());
            self.save(&prefs)?;
        }
        Ok(prefs)
    }
}

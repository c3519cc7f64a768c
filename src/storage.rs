use crate::engine::EngineError;
use crate::model::RotationState;
use std::sync::Mutex;
use thiserror::Error;

#[cfg(feature = "io")]
pub use json::JsonStorage;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("revision conflict: expected {expected}, found {found}")]
    Conflict { expected: u64, found: u64 },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Dépôt d'état versionné.
///
/// Toute écriture passe par un compare-and-swap sur `revision` : deux
/// appareils qui lisent le même instantané ne peuvent pas s'écraser
/// mutuellement, le second reçoit `StoreError::Conflict`.
pub trait Storage {
    /// Charge l'état ; renvoie `RotationState::placeholder()` si rien n'est persisté.
    fn load(&self) -> Result<RotationState, StoreError>;
    /// Écrit `state` si la révision stockée vaut `state.revision`, renvoie la nouvelle.
    fn save(&self, state: &RotationState) -> Result<u64, StoreError>;
}

/// Lecture, transformation, écriture conditionnelle. Pas de nouvel essai en
/// cas de conflit : c'est à l'appelant de décider.
pub fn update<S, F>(store: &S, f: F) -> Result<RotationState, StoreError>
where
    S: Storage + ?Sized,
    F: FnOnce(&RotationState) -> Result<RotationState, EngineError>,
{
    update_with(store, |state| f(state).map(|next| (next, ()))).map(|(state, ())| state)
}

/// Comme `update`, en laissant la transformation renvoyer une valeur annexe.
pub fn update_with<S, F, T>(store: &S, f: F) -> Result<(RotationState, T), StoreError>
where
    S: Storage + ?Sized,
    F: FnOnce(&RotationState) -> Result<(RotationState, T), EngineError>,
{
    let current = store.load()?;
    let (mut next, extra) = f(&current)?;
    next.revision = current.revision;
    next.revision = store.save(&next)?;
    Ok((next, extra))
}

/// Dépôt en mémoire, sérialisé par un mutex.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<Option<RotationState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RotationState) -> Self {
        Self {
            inner: Mutex::new(Some(state)),
        }
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<RotationState, StoreError> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        Ok(guard.clone().unwrap_or_else(RotationState::placeholder))
    }

    fn save(&self, state: &RotationState) -> Result<u64, StoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        let found = guard.as_ref().map_or(0, |s| s.revision);
        if found != state.revision {
            return Err(StoreError::Conflict {
                expected: state.revision,
                found,
            });
        }
        let mut stored = state.clone();
        stored.revision = found + 1;
        *guard = Some(stored);
        Ok(found + 1)
    }
}

#[cfg(feature = "io")]
mod json {
    use super::{Storage, StoreError};
    use crate::model::RotationState;
    use anyhow::Context;
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::NamedTempFile;

    /// Fichier JSON unique, remplacé atomiquement à chaque écriture.
    ///
    /// La révision sur disque est relue juste avant le renommage ; entre deux
    /// processus il reste une petite fenêtre entre cette lecture et `persist`.
    pub struct JsonStorage {
        path: PathBuf,
    }

    impl JsonStorage {
        pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
            Ok(Self {
                path: path.as_ref().to_path_buf(),
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read(&self) -> anyhow::Result<Option<RotationState>> {
            if !self.path.exists() {
                return Ok(None);
            }
            let data =
                fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
            let state: RotationState = serde_json::from_slice(&data)
                .with_context(|| format!("parsing {}", self.path.display()))?;
            Ok(Some(state))
        }
    }

    impl Storage for JsonStorage {
        fn load(&self) -> Result<RotationState, StoreError> {
            let state = self.read()?.unwrap_or_else(RotationState::placeholder);
            #[cfg(feature = "logging")]
            tracing::debug!(path = %self.path.display(), revision = state.revision, "state loaded");
            Ok(state)
        }

        fn save(&self, state: &RotationState) -> Result<u64, StoreError> {
            let found = self.read()?.map_or(0, |s| s.revision);
            if found != state.revision {
                #[cfg(feature = "logging")]
                tracing::warn!(expected = state.revision, found, "revision conflict");
                return Err(StoreError::Conflict {
                    expected: state.revision,
                    found,
                });
            }

            let mut stored = state.clone();
            stored.revision = found + 1;
            let json = serde_json::to_vec_pretty(&stored).context("serializing state")?;
            let mut tmp = NamedTempFile::new_in(
                self.path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new(".")),
            )
            .context("creating temp file")?;
            tmp.write_all(&json).context("writing temp file")?;
            tmp.flush().context("flushing temp file")?;
            tmp.as_file().sync_all().context("syncing temp file")?;
            tmp.persist(&self.path).context("atomic rename")?;

            #[cfg(feature = "logging")]
            tracing::debug!(path = %self.path.display(), revision = stored.revision, "state saved");
            Ok(stored.revision)
        }
    }
}

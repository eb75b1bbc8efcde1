//! Resource bindings: which image plays for which pet state.
//!
//! Persisted in `settings.json` next to the other user preferences:
//!
//! ```json
//! {
//!   "gifMapping": { "working": "/Users/me/gifs/typing.gif" },
//!   "googleApiKey": null,
//!   "petSize": 120
//! }
//! ```
//!
//! Older builds wrote the bare mapping object; that layout is still accepted on load.
//! A binding whose file has since disappeared resolves to nothing, exactly like a
//! missing binding.

use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{PetError, Result};
use crate::state::PetState;

pub const DEFAULT_PET_SIZE: f64 = 120.0;

/// Read-only lookup from a pet state to a decodable resource.
pub trait ResourceResolver {
    fn resource_for(&self, state: PetState) -> Option<PathBuf>;
}

impl<F> ResourceResolver for F
where
    F: Fn(PetState) -> Option<PathBuf>,
{
    fn resource_for(&self, state: PetState) -> Option<PathBuf> {
        self(state)
    }
}

/// On-disk settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub gif_mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub google_api_key: Option<String>,
    #[serde(default)]
    pub pet_size: Option<f64>,
}

impl Settings {
    /// Parses either the current layout or the legacy bare mapping.
    ///
    /// `gifMapping` is required so a legacy file never parses as empty settings.
    pub fn parse(content: &str) -> Option<Settings> {
        if let Ok(settings) = serde_json::from_str::<Settings>(content) {
            return Some(settings);
        }
        serde_json::from_str::<BTreeMap<String, String>>(content)
            .ok()
            .map(|gif_mapping| Settings {
                gif_mapping,
                ..Settings::default()
            })
    }
}

/// State → resource mapping backed by the settings file.
#[derive(Debug, Clone)]
pub struct GifAssignment {
    settings: Settings,
    path: Option<PathBuf>,
}

impl GifAssignment {
    pub fn new_in_memory() -> Self {
        GifAssignment {
            settings: Settings::default(),
            path: None,
        }
    }

    /// Loads the settings at `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let settings = match fs::read_to_string(path) {
            Ok(content) => Settings::parse(&content).unwrap_or_else(|| {
                warn!(path = %path.display(), "Ignoring malformed settings file");
                Settings::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(err) => {
                warn!(error = %err, "Failed to read settings file");
                Settings::default()
            }
        };

        GifAssignment {
            settings,
            path: Some(path.to_path_buf()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the bound resource for `state` if it still exists on disk.
    pub fn gif_path(&self, state: PetState) -> Option<PathBuf> {
        let raw = self.settings.gif_mapping.get(state.as_str())?;
        if raw.is_empty() {
            return None;
        }
        let path = PathBuf::from(raw);
        if path.exists() {
            Some(path)
        } else {
            debug!(state = %state, path = %path.display(), "Bound resource no longer exists");
            None
        }
    }

    /// Every state with its raw binding (which may point at a missing file).
    pub fn bindings(&self) -> Vec<(PetState, Option<&str>)> {
        PetState::ALL
            .into_iter()
            .map(|state| {
                let raw = self
                    .settings
                    .gif_mapping
                    .get(state.as_str())
                    .map(String::as_str);
                (state, raw)
            })
            .collect()
    }

    /// Binds `resource` to `state` and saves. The resource must exist.
    pub fn set_gif(&mut self, state: PetState, resource: &Path) -> Result<()> {
        if !resource.is_file() {
            return Err(PetError::ResourceNotFound(resource.to_path_buf()));
        }
        self.settings
            .gif_mapping
            .insert(state.as_str().to_string(), resource.display().to_string());
        self.save()
    }

    /// Removes the binding for `state` and saves.
    pub fn clear_gif(&mut self, state: PetState) -> Result<()> {
        self.settings.gif_mapping.remove(state.as_str());
        self.save()
    }

    pub fn google_api_key(&self) -> Option<&str> {
        self.settings.google_api_key.as_deref()
    }

    pub fn pet_size(&self) -> f64 {
        self.settings.pet_size.unwrap_or(DEFAULT_PET_SIZE)
    }

    /// Writes the settings atomically (temp file + rename). In-memory stores are a no-op.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| PetError::io("creating settings directory", e))?;

        let content = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| PetError::json("serializing settings", e))?;

        let mut temp_file =
            NamedTempFile::new_in(dir).map_err(|e| PetError::io("creating temp settings", e))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| PetError::io("writing settings", e))?;
        temp_file
            .persist(path)
            .map_err(|e| PetError::io("persisting settings", e.error))?;
        Ok(())
    }
}

impl ResourceResolver for GifAssignment {
    fn resource_for(&self, state: PetState) -> Option<PathBuf> {
        self.gif_path(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_settings_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let assignment = GifAssignment::load(&temp.path().join("settings.json"));

        assert_eq!(assignment.settings(), &Settings::default());
        assert_eq!(assignment.pet_size(), DEFAULT_PET_SIZE);
        assert_eq!(assignment.gif_path(PetState::Idle), None);
    }

    #[test]
    fn test_set_gif_persists_and_resolves() {
        let temp = tempdir().unwrap();
        let settings_path = temp.path().join("nested").join("settings.json");
        let gif = temp.path().join("idle.gif");
        std::fs::write(&gif, b"GIF89a").unwrap();

        let mut assignment = GifAssignment::load(&settings_path);
        assignment.set_gif(PetState::Idle, &gif).unwrap();

        let reloaded = GifAssignment::load(&settings_path);
        assert_eq!(reloaded.gif_path(PetState::Idle), Some(gif.clone()));
        assert_eq!(reloaded.resource_for(PetState::Idle), Some(gif));
        assert_eq!(reloaded.gif_path(PetState::Working), None);
    }

    #[test]
    fn test_deleted_resource_resolves_to_none() {
        let temp = tempdir().unwrap();
        let gif = temp.path().join("happy.gif");
        std::fs::write(&gif, b"GIF89a").unwrap();
        let mut assignment = GifAssignment::load(&temp.path().join("settings.json"));
        assignment.set_gif(PetState::Happy, &gif).unwrap();

        std::fs::remove_file(&gif).unwrap();

        assert_eq!(assignment.gif_path(PetState::Happy), None);
        assert!(matches!(
            assignment.bindings()[3],
            (PetState::Happy, Some(_))
        ));
    }

    #[test]
    fn test_set_gif_rejects_missing_resource() {
        let temp = tempdir().unwrap();
        let mut assignment = GifAssignment::new_in_memory();

        let result = assignment.set_gif(PetState::Sad, &temp.path().join("nope.gif"));

        assert!(matches!(result, Err(PetError::ResourceNotFound(_))));
    }

    #[test]
    fn test_clear_gif_removes_binding() {
        let temp = tempdir().unwrap();
        let settings_path = temp.path().join("settings.json");
        let gif = temp.path().join("sleep.gif");
        std::fs::write(&gif, b"GIF89a").unwrap();
        let mut assignment = GifAssignment::load(&settings_path);
        assignment.set_gif(PetState::Sleeping, &gif).unwrap();

        assignment.clear_gif(PetState::Sleeping).unwrap();

        let reloaded = GifAssignment::load(&settings_path);
        assert_eq!(reloaded.gif_path(PetState::Sleeping), None);
    }

    #[test]
    fn test_loads_legacy_bare_mapping() {
        let temp = tempdir().unwrap();
        let settings_path = temp.path().join("settings.json");
        let gif = temp.path().join("work.gif");
        std::fs::write(&gif, b"GIF89a").unwrap();
        let legacy = serde_json::json!({ "working": gif.display().to_string() });
        std::fs::write(&settings_path, legacy.to_string()).unwrap();

        let assignment = GifAssignment::load(&settings_path);

        assert_eq!(assignment.gif_path(PetState::Working), Some(gif));
        assert_eq!(assignment.google_api_key(), None);
    }

    #[test]
    fn test_keeps_unrelated_settings_on_save() {
        let temp = tempdir().unwrap();
        let settings_path = temp.path().join("settings.json");
        std::fs::write(
            &settings_path,
            r#"{"gifMapping":{},"googleApiKey":"key-123","petSize":96}"#,
        )
        .unwrap();

        let mut assignment = GifAssignment::load(&settings_path);
        assignment.clear_gif(PetState::Idle).unwrap();

        let reloaded = GifAssignment::load(&settings_path);
        assert_eq!(reloaded.google_api_key(), Some("key-123"));
        assert_eq!(reloaded.pet_size(), 96.0);
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let temp = tempdir().unwrap();
        let settings_path = temp.path().join("settings.json");
        std::fs::write(&settings_path, "{ not json").unwrap();

        let assignment = GifAssignment::load(&settings_path);

        assert_eq!(assignment.settings(), &Settings::default());
    }

    #[test]
    fn test_empty_path_is_treated_as_unassigned() {
        let assignment = GifAssignment {
            settings: Settings {
                gif_mapping: BTreeMap::from([("idle".to_string(), String::new())]),
                ..Settings::default()
            },
            path: None,
        };
        assert_eq!(assignment.gif_path(PetState::Idle), None);
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |state: PetState| {
            (state == PetState::Working).then(|| PathBuf::from("/tmp/working.gif"))
        };
        assert_eq!(
            resolver.resource_for(PetState::Working),
            Some(PathBuf::from("/tmp/working.gif"))
        );
        assert_eq!(resolver.resource_for(PetState::Idle), None);
    }
}

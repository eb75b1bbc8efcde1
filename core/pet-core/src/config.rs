//! Well-known paths shared by the hook writer and the pet.
//!
//! - `~/.claude-pet/current-event.json`: latest hook event, overwritten in place
//! - `~/.claude-pet/events.jsonl`: append-only event log used for statistics
//! - `~/.claude-pet/logs/`: daily rolling log files
//! - `<config dir>/claude-pet/settings.json`: resource bindings and preferences
//!
//! `CLAUDE_PET_HOME` replaces `~/.claude-pet` (and holds the settings file too).

use std::env;
use std::path::PathBuf;

use crate::error::{PetError, Result};

pub const HOME_ENV: &str = "CLAUDE_PET_HOME";
const PET_DIR_NAME: &str = ".claude-pet";
const APP_DIR_NAME: &str = "claude-pet";
const EVENT_FILE_NAME: &str = "current-event.json";
const EVENT_LOG_FILE_NAME: &str = "events.jsonl";
const SETTINGS_FILE_NAME: &str = "settings.json";

fn home_override() -> Option<PathBuf> {
    env::var_os(HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Returns the directory shared with the hook script (`~/.claude-pet`).
pub fn pet_dir() -> Result<PathBuf> {
    if let Some(dir) = home_override() {
        return Ok(dir);
    }
    let home = dirs::home_dir().ok_or(PetError::HomeDirNotFound)?;
    Ok(home.join(PET_DIR_NAME))
}

pub fn event_file_path() -> Result<PathBuf> {
    Ok(pet_dir()?.join(EVENT_FILE_NAME))
}

pub fn event_log_path() -> Result<PathBuf> {
    Ok(pet_dir()?.join(EVENT_LOG_FILE_NAME))
}

pub fn log_dir() -> Result<PathBuf> {
    Ok(pet_dir()?.join("logs"))
}

/// Returns the settings file path (platform config dir, e.g. Application Support on macOS).
pub fn settings_path() -> Result<PathBuf> {
    if let Some(dir) = home_override() {
        return Ok(dir.join(SETTINGS_FILE_NAME));
    }
    let config = dirs::config_dir().ok_or(PetError::ConfigDirNotFound)?;
    Ok(config.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

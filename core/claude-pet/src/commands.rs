//! One-shot commands: statistics and binding management.

use pet_core::stats::today_stats;
use pet_core::{config, GifAssignment, PetState};
use std::path::Path;

pub fn stats() -> Result<(), String> {
    let event_log = config::event_log_path().map_err(|e| e.to_string())?;
    let stats = today_stats(&event_log).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&stats)
        .map_err(|e| format!("Failed to serialize stats: {}", e))?;
    println!("{}", json);
    Ok(())
}

pub fn assign(state: &str, resource: &Path) -> Result<(), String> {
    let state: PetState = state.parse().map_err(|e: pet_core::PetError| e.to_string())?;
    let mut assignment = load_assignment()?;
    assignment.set_gif(state, resource).map_err(|e| e.to_string())?;
    tracing::info!(state = %state, path = %resource.display(), "Animation assigned");
    Ok(())
}

pub fn unassign(state: &str) -> Result<(), String> {
    let state: PetState = state.parse().map_err(|e: pet_core::PetError| e.to_string())?;
    let mut assignment = load_assignment()?;
    assignment.clear_gif(state).map_err(|e| e.to_string())?;
    tracing::info!(state = %state, "Animation unassigned");
    Ok(())
}

pub fn mapping() -> Result<(), String> {
    let assignment = load_assignment()?;
    for (state, raw) in assignment.bindings() {
        let status = match raw {
            None => "-".to_string(),
            Some(path) if assignment.gif_path(state).is_some() => path.to_string(),
            Some(path) => format!("{} (missing)", path),
        };
        println!("{:<12} {}", state.as_str(), status);
    }
    println!("{:<12} {}", "size", assignment.pet_size());
    Ok(())
}

fn load_assignment() -> Result<GifAssignment, String> {
    let path = config::settings_path().map_err(|e| e.to_string())?;
    Ok(GifAssignment::load(&path))
}

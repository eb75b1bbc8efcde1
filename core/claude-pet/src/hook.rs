//! Hook handler: reads Claude Code's hook payload from stdin and publishes it.

use chrono::Utc;
use pet_core::{config, hook};
use std::io::{self, Read};

pub fn run() -> Result<(), String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| format!("Failed to read stdin: {}", e))?;

    let event_file = config::event_file_path().map_err(|e| e.to_string())?;
    let event_log = config::event_log_path().map_err(|e| e.to_string())?;

    match hook::record_hook_input(&input, &event_file, &event_log, Utc::now()) {
        Ok(Some(event)) => {
            tracing::info!(
                event = %event.kind,
                tool = event.tool.as_deref().unwrap_or("-"),
                "Hook event recorded"
            );
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

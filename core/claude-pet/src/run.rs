//! `run`: drives the pet from the event file until Ctrl-C.
//!
//! There is no window here; [`LogView`] prints state changes and traces frames, which
//! is enough to watch the pet follow a live Claude Code session from a terminal.

use pet_core::runtime::now;
use pet_core::{
    config, FrameImage, FrameSink, GifAssignment, PetRuntime, PetState, PetStateMachine, PetView,
};
use std::path::PathBuf;

/// Terminal stand-in for the pet window.
#[derive(Debug, Default)]
struct LogView {
    frames_shown: u64,
}

impl FrameSink for LogView {
    fn show_frame(&mut self, image: &FrameImage) {
        self.frames_shown += 1;
        tracing::trace!(
            width = image.width(),
            height = image.height(),
            frames_shown = self.frames_shown,
            "Frame"
        );
    }
}

impl PetView for LogView {
    fn state_changed(&mut self, state: PetState) {
        println!("{}", state);
    }

    fn clear_frame(&mut self) {
        tracing::info!("No animation; showing placeholder");
    }
}

pub fn run(gif: Option<PathBuf>, event_file: Option<PathBuf>) -> Result<(), String> {
    let settings_path = config::settings_path().map_err(|e| e.to_string())?;
    let event_file = match event_file {
        Some(path) => path,
        None => config::event_file_path().map_err(|e| e.to_string())?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to build runtime: {}", e))?;

    runtime.block_on(async move {
        let assignment = GifAssignment::load(&settings_path);
        let mut machine = PetStateMachine::new(assignment, LogView::default());
        match &gif {
            Some(path) => {
                machine.load_override(path, now());
            }
            None => machine.start(now()),
        }

        tracing::info!(
            event_file = %event_file.display(),
            settings = %settings_path.display(),
            "Pet running; press Ctrl-C to quit"
        );

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        let machine = PetRuntime::new(machine, event_file).run(shutdown).await;
        tracing::info!(frames_shown = machine.view().frames_shown, "Pet stopped");
    });

    Ok(())
}

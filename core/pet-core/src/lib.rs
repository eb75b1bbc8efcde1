//! # pet-core
//!
//! Core library for Claude Pet: a desktop companion whose animation mirrors what
//! Claude Code is doing.
//!
//! ```text
//! Claude Code → hook (writer) → current-event.json → EventWatcher → PetStateMachine → AnimationEngine → view
//!                                   (polled mtime)                   (idle / auto-return)   (frame timer)
//! ```
//!
//! ## Design Principles
//!
//! - **Deadlines, not threads**: the state machine and animation engine are plain
//!   structs whose timers are `Instant` deadlines. [`PetRuntime`] is the only loop.
//! - **Graceful degradation**: missing files, undecodable events and broken images
//!   turn into "do nothing" or a placeholder, never an error for the caller.
//! - **Single mutator**: every state change goes through [`PetStateMachine::transition`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pet_core::{config, GifAssignment, PetRuntime, PetStateMachine};
//!
//! let assignment = GifAssignment::load(&config::settings_path()?);
//! let mut machine = PetStateMachine::new(assignment, view);
//! machine.start(pet_core::runtime::now());
//! PetRuntime::new(machine, config::event_file_path()?).run(shutdown).await;
//! ```

pub mod animation;
pub mod assignment;
pub mod config;
pub mod error;
pub mod event;
pub mod hook;
pub mod machine;
pub mod runtime;
pub mod state;
pub mod stats;
pub mod watcher;

pub use animation::{
    decode_frames, AnimationEngine, AnimationFrame, FrameImage, FrameSink, FrameTiming,
};
pub use assignment::{GifAssignment, ResourceResolver, Settings};
pub use error::{AnimationError, PetError, Result};
pub use event::{target_state, ActivityEvent, EventKind, ToolClass};
pub use hook::HookInput;
pub use machine::{PetStateMachine, PetView};
pub use runtime::PetRuntime;
pub use state::{PetState, AUTO_RETURN_DELAY, IDLE_TIMEOUT, POLL_INTERVAL};
pub use stats::DayStats;
pub use watcher::{EventSource, EventWatcher};

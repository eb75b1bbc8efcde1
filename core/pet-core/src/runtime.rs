//! Single-threaded driver tying the watcher to the state machine.
//!
//! One `select!` loop serializes everything: watcher events arrive over a channel,
//! and the loop sleeps until the machine's earliest deadline (idle, auto-return or
//! next frame). No branch can interrupt another, so timers and events never race
//! on the pet's state.

use std::future::{self, Future};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info};

use crate::assignment::ResourceResolver;
use crate::machine::{PetStateMachine, PetView};
use crate::watcher::EventWatcher;

pub struct PetRuntime<R, V> {
    machine: PetStateMachine<R, V>,
    watcher: EventWatcher,
}

impl<R, V> PetRuntime<R, V>
where
    R: ResourceResolver,
    V: PetView,
{
    pub fn new(machine: PetStateMachine<R, V>, event_file: impl Into<PathBuf>) -> Self {
        PetRuntime {
            machine,
            watcher: EventWatcher::new(event_file),
        }
    }

    pub fn machine(&self) -> &PetStateMachine<R, V> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut PetStateMachine<R, V> {
        &mut self.machine
    }

    /// Runs until `shutdown` resolves, then stops the watcher and hands the machine back.
    ///
    /// The initial presentation should already have happened (see [`PetStateMachine::start`]).
    pub async fn run<F>(mut self, shutdown: F) -> PetStateMachine<R, V>
    where
        F: Future<Output = ()>,
    {
        let (tx, mut events) = mpsc::unbounded_channel();
        self.watcher.start(move |event| {
            if tx.send(event).is_err() {
                debug!("Runtime stopped; dropping event");
            }
        });

        tokio::pin!(shutdown);
        loop {
            let deadline = self.machine.next_deadline();
            tokio::select! {
                biased;

                () = &mut shutdown => break,
                Some(event) = events.recv() => {
                    self.machine.handle_event(&event, now());
                }
                () = sleep_until(deadline) => {
                    self.machine.fire_due(now());
                }
            }
        }

        self.watcher.stop();
        info!(state = %self.machine.current_state(), "Pet runtime stopped");
        self.machine
    }
}

/// Current time on the tokio clock, so paused-clock tests see virtual time.
pub fn now() -> std::time::Instant {
    time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(time::Instant::from_std(deadline)).await,
        None => future::pending().await,
    }
}

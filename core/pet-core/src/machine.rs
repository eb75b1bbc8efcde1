//! Pet state machine.
//!
//! Owns the current [`PetState`], the idle timer, the auto-return timer and the
//! animation engine. Timers are deadlines; the driver calls [`PetStateMachine::fire_due`]
//! once [`PetStateMachine::next_deadline`] has passed. Every state change, whether
//! caused by an event or a timer, goes through [`PetStateMachine::transition`]:
//!
//! ```text
//! cancel auto-return → set state → notify view → load resource (or clear) → arm auto-return
//! ```
//!
//! The idle timer is re-armed by every accepted event, including events that do not
//! change state. When it fires the pet goes to sleep regardless of its current state.

use std::mem;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::animation::{AnimationEngine, FrameSink};
use crate::assignment::ResourceResolver;
use crate::event::{target_state, ActivityEvent};
use crate::state::{PetState, IDLE_TIMEOUT};

/// Rendering collaborator: receives frames, state changes and fallback requests.
pub trait PetView: FrameSink {
    /// Called on every transition, whether or not a resource is bound.
    fn state_changed(&mut self, state: PetState);

    /// Called when there is nothing to animate and a placeholder should be shown.
    fn clear_frame(&mut self);
}

pub struct PetStateMachine<R, V> {
    current: PetState,
    resolver: R,
    animator: AnimationEngine<V>,
    idle_deadline: Option<Instant>,
    auto_return_deadline: Option<Instant>,
}

impl<R, V> PetStateMachine<R, V>
where
    R: ResourceResolver,
    V: PetView,
{
    pub fn new(resolver: R, view: V) -> Self {
        PetStateMachine {
            current: PetState::Idle,
            resolver,
            animator: AnimationEngine::new(view),
            idle_deadline: None,
            auto_return_deadline: None,
        }
    }

    pub fn current_state(&self) -> PetState {
        self.current
    }

    pub fn view(&self) -> &V {
        self.animator.sink()
    }

    pub fn animator(&self) -> &AnimationEngine<V> {
        &self.animator
    }

    pub fn idle_deadline(&self) -> Option<Instant> {
        self.idle_deadline
    }

    pub fn auto_return_deadline(&self) -> Option<Instant> {
        self.auto_return_deadline
    }

    /// Shows the resource for the initial state. No notification, no idle timer.
    pub fn start(&mut self, now: Instant) {
        self.present(now);
    }

    /// Plays an explicit resource instead of the current state's binding.
    ///
    /// Returns false (and shows the fallback) if it cannot be decoded.
    pub fn load_override(&mut self, resource: &Path, now: Instant) -> bool {
        match self.animator.load(resource, now) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Failed to load override resource");
                self.animator.sink_mut().clear_frame();
                false
            }
        }
    }

    /// Applies one activity event. Returns the new state, or `None` if the event
    /// only counted as activity.
    pub fn handle_event(&mut self, event: &ActivityEvent, now: Instant) -> Option<PetState> {
        info!(
            event = %event.kind,
            tool = event.tool.as_deref().unwrap_or("-"),
            session = event.session_id.as_deref().unwrap_or("-"),
            "Received event"
        );
        self.reset_idle_timer(now);

        let Some(target) = target_state(event) else {
            debug!(event = %event.kind, "Event does not change state");
            return None;
        };
        self.transition(target, now);
        Some(target)
    }

    /// Re-arms the idle timer [`IDLE_TIMEOUT`] from `now`.
    pub fn reset_idle_timer(&mut self, now: Instant) {
        self.idle_deadline = Some(now + IDLE_TIMEOUT);
    }

    /// The only place the current state changes.
    pub fn transition(&mut self, state: PetState, now: Instant) {
        self.auto_return_deadline = None;

        let previous = mem::replace(&mut self.current, state);
        info!(from = %previous, to = %state, "Pet state transition");
        self.animator.sink_mut().state_changed(state);

        self.present(now);

        if let Some(delay) = state.auto_return_delay() {
            self.auto_return_deadline = Some(now + delay);
        }
    }

    /// Earliest pending deadline across idle, auto-return and frame timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.idle_deadline,
            self.auto_return_deadline,
            self.animator.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Fires every timer due at `now`, state timers in deadline order, then the frame timer.
    pub fn fire_due(&mut self, now: Instant) {
        loop {
            let idle = self.idle_deadline.filter(|deadline| *deadline <= now);
            let auto_return = self.auto_return_deadline.filter(|deadline| *deadline <= now);

            match (idle, auto_return) {
                (None, None) => break,
                (Some(idle), Some(auto_return)) if auto_return < idle => {
                    self.fire_auto_return(now)
                }
                (Some(_), _) => self.fire_idle_timeout(now),
                (None, Some(_)) => self.fire_auto_return(now),
            }
        }

        self.animator.advance(now);
    }

    fn fire_idle_timeout(&mut self, now: Instant) {
        self.idle_deadline = None;
        info!(state = %self.current, "Idle timeout, going to sleep");
        self.transition(PetState::Sleeping, now);
    }

    fn fire_auto_return(&mut self, now: Instant) {
        self.auto_return_deadline = None;
        debug!(state = %self.current, "Auto-return to idle");
        self.transition(PetState::Idle, now);
    }

    fn present(&mut self, now: Instant) {
        let Some(resource) = self.resolver.resource_for(self.current) else {
            self.animator.stop();
            self.animator.sink_mut().clear_frame();
            return;
        };

        if let Err(err) = self.animator.load(&resource, now) {
            warn!(
                error = %err,
                state = %self.current,
                "Failed to load resource, showing placeholder"
            );
            self.animator.sink_mut().clear_frame();
        }
    }
}

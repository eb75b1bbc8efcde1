//! End-to-end state machine scenarios driven with explicit instants.

use image::codecs::gif::GifEncoder;
use image::{Delay, Frame, Rgba, RgbaImage};
use pet_core::{
    ActivityEvent, FrameImage, FrameSink, GifAssignment, PetState, PetStateMachine, PetView,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Recorder {
    states: Vec<PetState>,
    frames: usize,
    clears: usize,
}

impl FrameSink for Recorder {
    fn show_frame(&mut self, _image: &FrameImage) {
        self.frames += 1;
    }
}

impl PetView for Recorder {
    fn state_changed(&mut self, state: PetState) {
        self.states.push(state);
    }

    fn clear_frame(&mut self) {
        self.clears += 1;
    }
}

fn unbound(_: PetState) -> Option<PathBuf> {
    None
}

fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

fn write_gif(path: &Path, frames: usize, delay_ms: u32) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = GifEncoder::new(file);
    for i in 0..frames {
        let image = RgbaImage::from_pixel(4, 4, Rgba([i as u8 * 40, 0, 0, 255]));
        encoder
            .encode_frame(Frame::from_parts(
                image,
                0,
                0,
                Delay::from_numer_denom_ms(delay_ms, 1),
            ))
            .unwrap();
    }
}

#[test]
fn test_session_from_tool_use_to_sleep() {
    let t0 = Instant::now();
    let mut machine = PetStateMachine::new(unbound, Recorder::default());
    machine.start(t0);

    machine.handle_event(&ActivityEvent::new("PreToolUse").with_tool("Bash"), t0);
    machine.handle_event(&ActivityEvent::new("PostToolUse"), t0 + secs(1));
    let stop_at = t0 + secs(2);
    machine.handle_event(&ActivityEvent::new("Stop"), stop_at);

    assert_eq!(
        machine.view().states,
        vec![PetState::Working, PetState::Happy, PetState::Celebrating]
    );

    // The happy auto-return was superseded by the stop.
    machine.fire_due(t0 + secs(4));
    assert_eq!(machine.current_state(), PetState::Celebrating);

    machine.fire_due(stop_at + secs(3));
    assert_eq!(machine.current_state(), PetState::Idle);
    assert_eq!(machine.next_deadline(), Some(stop_at + secs(300)));

    machine.fire_due(stop_at + secs(299));
    assert_eq!(machine.current_state(), PetState::Idle);

    machine.fire_due(stop_at + secs(300));
    assert_eq!(machine.current_state(), PetState::Sleeping);
    assert_eq!(
        machine.view().states,
        vec![
            PetState::Working,
            PetState::Happy,
            PetState::Celebrating,
            PetState::Idle,
            PetState::Sleeping,
        ]
    );
    assert_eq!(machine.next_deadline(), None);
}

#[test]
fn test_notification_keeps_pet_awake_without_changing_state() {
    let t0 = Instant::now();
    let mut machine = PetStateMachine::new(unbound, Recorder::default());
    machine.start(t0);

    machine.handle_event(&ActivityEvent::new("PreToolUse").with_tool("Read"), t0);
    assert_eq!(
        machine.handle_event(&ActivityEvent::new("Notification"), t0 + secs(200)),
        None
    );

    machine.fire_due(t0 + secs(300));
    assert_eq!(machine.current_state(), PetState::Thinking);

    machine.fire_due(t0 + secs(500));
    assert_eq!(machine.current_state(), PetState::Sleeping);
}

#[test]
fn test_bindings_from_settings_file_drive_animation() {
    let temp = tempfile::tempdir().unwrap();
    let gif = temp.path().join("working.gif");
    write_gif(&gif, 3, 50);
    let settings = temp.path().join("settings.json");
    let content = serde_json::json!({
        "gifMapping": {
            "working": gif.display().to_string(),
            "happy": temp.path().join("gone.gif").display().to_string(),
        }
    });
    std::fs::write(&settings, content.to_string()).unwrap();

    let assignment = GifAssignment::load(&settings);
    let t0 = Instant::now();
    let mut machine = PetStateMachine::new(assignment, Recorder::default());
    machine.start(t0);
    assert_eq!(machine.view().clears, 1);

    machine.handle_event(&ActivityEvent::new("PreToolUse").with_tool("Edit"), t0);
    assert!(machine.animator().is_animating());
    assert_eq!(machine.animator().frame_count(), 3);
    assert_eq!(machine.view().frames, 1);

    machine.fire_due(t0 + Duration::from_millis(50));
    assert_eq!(machine.animator().current_index(), Some(1));
    assert_eq!(machine.view().frames, 2);

    // Bound to a file that no longer exists: treated as unbound.
    machine.handle_event(&ActivityEvent::new("PostToolUse"), t0 + secs(1));
    assert!(!machine.animator().is_active());
    assert_eq!(machine.view().clears, 2);
    assert_eq!(machine.view().frames, 2);
}

#[test]
fn test_override_plays_without_changing_state() {
    let temp = tempfile::tempdir().unwrap();
    let gif = temp.path().join("override.gif");
    write_gif(&gif, 2, 100);

    let t0 = Instant::now();
    let mut machine = PetStateMachine::new(unbound, Recorder::default());

    assert!(machine.load_override(&gif, t0));
    assert_eq!(machine.current_state(), PetState::Idle);
    assert!(machine.view().states.is_empty());
    assert_eq!(machine.next_deadline(), Some(t0 + Duration::from_millis(100)));

    assert!(!machine.load_override(&temp.path().join("missing.gif"), t0));
    assert_eq!(machine.view().clears, 1);
}

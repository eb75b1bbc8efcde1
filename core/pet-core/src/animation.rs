//! Multi-frame image playback.
//!
//! A resource (GIF, APNG, or any still image) is decoded once into an ordered list of
//! `(image, duration)` frames. Playback is a self-rescheduling single-shot timer:
//! after a frame is shown, the next deadline is that frame's own duration away. The
//! engine does not sleep; its owner fires [`AnimationEngine::advance`] once
//! [`AnimationEngine::next_deadline`] has passed.
//!
//! Frame durations resolve through a fixed chain, because many encoders only write one
//! of the two delay fields:
//!
//! ```text
//! unclamped delay (> 0) → standard delay (> 0) → 100 ms
//! ```

use fs_err as fs;
use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::{AnimationDecoder, Delay, DynamicImage, Frames, ImageFormat, ImageReader, RgbaImage};
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::AnimationError;

/// Duration used when a frame carries no usable delay.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(100);

/// Delays at or below this are raised to [`DEFAULT_FRAME_DURATION`] in the standard field,
/// matching how browsers and platform decoders treat "as fast as possible" GIFs.
const STANDARD_DELAY_FLOOR_SECS: f64 = 0.01;

/// Decoded bitmap handed to the renderer. Cheap to clone.
pub type FrameImage = Arc<RgbaImage>;

/// Delay metadata attached to a single decoded frame, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    /// Delay exactly as authored.
    pub unclamped_delay: Option<f64>,
    /// Delay after the platform's minimum-delay clamp.
    pub delay: Option<f64>,
}

impl FrameTiming {
    /// Builds both delay fields from the raw delay stored in the container.
    pub fn from_delay(delay: Delay) -> Self {
        let (numer, denom) = delay.numer_denom_ms();
        let secs = if denom == 0 {
            0.0
        } else {
            f64::from(numer) / f64::from(denom) / 1000.0
        };
        let standard = if secs <= STANDARD_DELAY_FLOOR_SECS {
            DEFAULT_FRAME_DURATION.as_secs_f64()
        } else {
            secs
        };

        FrameTiming {
            unclamped_delay: Some(secs),
            delay: Some(standard),
        }
    }

    /// Resolves the display duration: unclamped, then standard, then the 100 ms default.
    pub fn duration(&self) -> Duration {
        [self.unclamped_delay, self.delay]
            .into_iter()
            .flatten()
            .find(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or(DEFAULT_FRAME_DURATION)
    }
}

/// One decoded image plus how long it stays on screen.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub image: FrameImage,
    pub duration: Duration,
}

impl AnimationFrame {
    pub fn new(image: RgbaImage, duration: Duration) -> Self {
        AnimationFrame {
            image: Arc::new(image),
            duration,
        }
    }
}

/// Decodes every frame of the resource at `path`.
///
/// Animated GIF and APNG yield one frame per animation frame; any other supported
/// image yields a single frame. A frame that fails to decode ends the sequence.
pub fn decode_frames(path: &Path) -> Result<Vec<AnimationFrame>, AnimationError> {
    let io_err = |source: std::io::Error| AnimationError::Io {
        path: path.to_path_buf(),
        source,
    };
    let image_err = |source: image::ImageError| AnimationError::Image {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?;

    let frames = match reader.format() {
        Some(ImageFormat::Gif) => {
            let file = BufReader::new(fs::File::open(path).map_err(io_err)?);
            let decoder = GifDecoder::new(file).map_err(image_err)?;
            collect_frames(decoder.into_frames(), path)
        }
        Some(ImageFormat::Png) => {
            let file = BufReader::new(fs::File::open(path).map_err(io_err)?);
            let mut decoder = PngDecoder::new(file).map_err(image_err)?;
            if decoder.is_apng().map_err(image_err)? {
                let apng = decoder.apng().map_err(image_err)?;
                collect_frames(apng.into_frames(), path)
            } else {
                let image = DynamicImage::from_decoder(decoder).map_err(image_err)?;
                vec![AnimationFrame::new(image.to_rgba8(), DEFAULT_FRAME_DURATION)]
            }
        }
        _ => {
            let image = reader.decode().map_err(image_err)?;
            vec![AnimationFrame::new(image.to_rgba8(), DEFAULT_FRAME_DURATION)]
        }
    };

    if frames.is_empty() {
        return Err(AnimationError::NoFrames);
    }
    debug!(path = %path.display(), frames = frames.len(), "Decoded animation");
    Ok(frames)
}

fn collect_frames(frames: Frames<'_>, path: &Path) -> Vec<AnimationFrame> {
    let mut decoded = Vec::new();
    for frame in frames {
        match frame {
            Ok(frame) => {
                let duration = FrameTiming::from_delay(frame.delay()).duration();
                decoded.push(AnimationFrame::new(frame.into_buffer(), duration));
            }
            Err(err) => {
                warn!(
                    error = %err,
                    path = %path.display(),
                    decoded = decoded.len(),
                    "Stopping at undecodable frame"
                );
                break;
            }
        }
    }
    decoded
}

/// Receives every frame the engine emits.
pub trait FrameSink {
    fn show_frame(&mut self, image: &FrameImage);
}

impl<F> FrameSink for F
where
    F: FnMut(&FrameImage),
{
    fn show_frame(&mut self, image: &FrameImage) {
        self(image)
    }
}

/// Live playback context, replaced wholesale on every load.
#[derive(Debug)]
struct AnimationSession {
    frames: Vec<AnimationFrame>,
    index: usize,
    /// Pending single-shot timer; `None` for still images.
    next_frame_at: Option<Instant>,
}

/// Plays decoded frames into a [`FrameSink`] honoring each frame's duration.
#[derive(Debug)]
pub struct AnimationEngine<S> {
    sink: S,
    session: Option<AnimationSession>,
}

impl<S: FrameSink> AnimationEngine<S> {
    pub fn new(sink: S) -> Self {
        AnimationEngine {
            sink,
            session: None,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Decodes `path` and starts playing it, replacing any current session.
    ///
    /// On failure the engine is left without a session; showing a fallback is up to the caller.
    pub fn load(&mut self, path: &Path, now: Instant) -> Result<(), AnimationError> {
        self.stop();
        let frames = decode_frames(path)?;
        self.load_frames(frames, now)
    }

    /// Starts playing already decoded frames, replacing any current session.
    ///
    /// Frame 0 is emitted immediately. A single frame is shown once and never rescheduled.
    pub fn load_frames(
        &mut self,
        frames: Vec<AnimationFrame>,
        now: Instant,
    ) -> Result<(), AnimationError> {
        self.stop();

        let Some(first) = frames.first() else {
            return Err(AnimationError::NoFrames);
        };
        let next_frame_at = (frames.len() > 1).then(|| now + first.duration);
        self.sink.show_frame(&first.image);

        self.session = Some(AnimationSession {
            frames,
            index: 0,
            next_frame_at,
        });
        Ok(())
    }

    /// Cancels the pending frame timer and drops the session. Idempotent.
    pub fn stop(&mut self) {
        self.session = None;
    }

    /// True while a session exists (animated or still).
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// True while a frame timer is pending.
    pub fn is_animating(&self) -> bool {
        self.next_deadline().is_some()
    }

    pub fn frame_count(&self) -> usize {
        self.session.as_ref().map_or(0, |session| session.frames.len())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|session| session.index)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.as_ref().and_then(|session| session.next_frame_at)
    }

    /// Fires the frame timer if it is due: emits the next frame (wrapping to 0) and
    /// reschedules with that frame's duration. Returns whether a frame was emitted.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.next_frame_at {
            Some(deadline) if now >= deadline => {}
            _ => return false,
        }

        session.index = (session.index + 1) % session.frames.len();
        let frame = &session.frames[session.index];
        session.next_frame_at = Some(now + frame.duration);
        self.sink.show_frame(&frame.image);
        true
    }
}

//! The capture-locate-detect loop

use crate::SessionError;
use face_locate::FaceLocator;
use frame_stream::{FrameError, FrameSource};
use proctoring::{DetectorSuite, FrameAnalysis};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Consecutive locator failures tolerated before the session gives up
const MAX_LOCATE_FAILURES: u32 = 30;

/// Outcome of one session tick
pub enum Step {
    /// Frame analyzed
    Analyzed(FrameAnalysis),
    /// Frame skipped (locator failure), loop continues
    Skipped,
    /// Source is exhausted
    Finished,
}

/// Owns the frame source, the locator, and the detector suite, and drives
/// one monitoring session to completion.
///
/// Locator failures skip the frame rather than ending the session; a camera
/// glitch must not terminate an exam recording.
pub struct ProctorSession<S: FrameSource, L: FaceLocator> {
    source: S,
    locator: L,
    suite: DetectorSuite,
    fps: u32,
    locate_failures: u32,
}

impl<S: FrameSource, L: FaceLocator> ProctorSession<S, L> {
    pub fn new(source: S, locator: L, suite: DetectorSuite, fps: u32) -> Self {
        Self {
            source,
            locator,
            suite,
            fps: fps.max(1),
            locate_failures: 0,
        }
    }

    /// Capture and analyze a single frame
    pub fn step(&mut self) -> Result<Step, SessionError> {
        let frame = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(FrameError::Exhausted) => return Ok(Step::Finished),
            Err(e) => return Err(SessionError::Frame(e)),
        };

        let gray = frame.to_gray();
        match self.locator.locate(&gray) {
            Ok(result) => {
                self.locate_failures = 0;
                let analysis = self.suite.process(&result, Instant::now());
                debug!(
                    sequence = frame.sequence,
                    face_present = analysis.face_present,
                    faces = analysis.face_count,
                    "Frame analyzed"
                );
                Ok(Step::Analyzed(analysis))
            }
            Err(e) => {
                self.locate_failures += 1;
                warn!(
                    sequence = frame.sequence,
                    error = %e,
                    failures = self.locate_failures,
                    "Locator failed; skipping frame"
                );
                if self.locate_failures > MAX_LOCATE_FAILURES {
                    return Err(SessionError::Locator(e));
                }
                Ok(Step::Skipped)
            }
        }
    }

    /// Run until the source ends or the frame limit is hit; returns the
    /// number of analyzed frames
    pub async fn run(&mut self, max_frames: Option<u64>) -> Result<u64, SessionError> {
        let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / self.fps as f64));
        let mut analyzed = 0u64;

        info!(fps = self.fps, ?max_frames, "Monitoring session started");
        loop {
            if let Some(limit) = max_frames {
                if analyzed >= limit {
                    break;
                }
            }
            ticker.tick().await;
            match self.step()? {
                Step::Analyzed(_) => analyzed += 1,
                Step::Skipped => {}
                Step::Finished => break,
            }
        }
        info!(analyzed, "Monitoring session finished");
        Ok(analyzed)
    }
}

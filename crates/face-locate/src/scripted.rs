//! Scripted locator for tests and demos

use crate::{FaceLocator, LocateError};
use frame_stream::{GrayFrame, Rect};
use proctoring::DetectionResult;
use std::collections::VecDeque;

/// Replays a prepared sequence of face/eye box sets, one per `locate` call.
///
/// The last step can optionally repeat forever, which makes it easy to
/// script "two people appear and stay" style scenarios.
pub struct ScriptedLocator {
    steps: VecDeque<(Vec<Rect>, Vec<Rect>)>,
    repeat_last: bool,
    last: Option<(Vec<Rect>, Vec<Rect>)>,
}

impl ScriptedLocator {
    pub fn new(steps: Vec<(Vec<Rect>, Vec<Rect>)>) -> Self {
        Self {
            steps: steps.into(),
            repeat_last: false,
            last: None,
        }
    }

    /// Keep replaying the final step after the script runs out
    pub fn repeating(mut self) -> Self {
        self.repeat_last = true;
        self
    }
}

impl FaceLocator for ScriptedLocator {
    fn locate(&mut self, gray: &GrayFrame) -> Result<DetectionResult, LocateError> {
        let step = match self.steps.pop_front() {
            Some(step) => {
                self.last = Some(step.clone());
                step
            }
            None if self.repeat_last => self
                .last
                .clone()
                .ok_or(LocateError::ScriptExhausted)?,
            None => return Err(LocateError::ScriptExhausted),
        };
        Ok(DetectionResult::new(step.0, step.1, gray.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order_then_exhausts() {
        let mut locator = ScriptedLocator::new(vec![
            (vec![Rect::new(0, 0, 10, 10)], vec![]),
            (vec![], vec![]),
        ]);
        let gray = GrayFrame::filled(8, 8, 0);

        assert_eq!(locator.locate(&gray).unwrap().face_count(), 1);
        assert_eq!(locator.locate(&gray).unwrap().face_count(), 0);
        assert!(locator.locate(&gray).is_err());
    }

    #[test]
    fn test_repeating_replays_last_step() {
        let mut locator =
            ScriptedLocator::new(vec![(vec![Rect::new(0, 0, 10, 10)], vec![])]).repeating();
        let gray = GrayFrame::filled(8, 8, 0);

        locator.locate(&gray).unwrap();
        assert_eq!(locator.locate(&gray).unwrap().face_count(), 1);
        assert_eq!(locator.locate(&gray).unwrap().face_count(), 1);
    }
}

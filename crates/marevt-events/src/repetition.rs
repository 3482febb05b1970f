//! Repetition-level metadata rows of a run.
//!
//! Each run's source events file lists one row per repetition (one attempt
//! at a level) with its onset within the run and the capture that recorded it.
//! These rows are carried into the annotated table alongside the derived
//! events.

use std::fmt;

use crate::{event::frames_to_seconds, trace::VariableTrace};

/// Stimulus file value written for repetitions whose capture was lost.
pub const MISSING_STIM_FILE: &str = "Missing file";

/// Whether a run explores a new level or practices known ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Discovery,
    Practice,
}

impl Phase {
    /// Classifies a run from the levels of its repetitions.
    ///
    /// Discovery runs repeat the same level, so the first two repetitions
    /// share it; anything else, including runs with fewer than two
    /// repetitions or unknown levels, is practice.
    #[must_use]
    pub fn from_levels<'a, I>(levels: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut levels = levels.into_iter();
        match (levels.next(), levels.next()) {
            (Some(Some(first)), Some(Some(second))) if first == second => Phase::Discovery,
            _ => Phase::Practice,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Discovery => "discovery",
            Phase::Practice => "practice",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

/// One repetition row of a run's events file.
#[derive(Debug, Clone, PartialEq)]
pub struct RepetitionRecord {
    /// Index of the row in the source events file.
    pub rep_index: usize,
    pub trial_type: String,
    /// Start of the repetition within the run, in seconds.
    pub onset: f64,
    pub level: Option<String>,
    /// Capture file reference, as written in the source events file.
    pub stim_file: Option<String>,
    pub duration: Option<f64>,
    pub frame_start: Option<usize>,
    pub frame_stop: Option<usize>,
    pub phase: Option<Phase>,
}

impl RepetitionRecord {
    #[must_use]
    pub fn new<T>(rep_index: usize, trial_type: T, onset: f64) -> Self
    where
        T: Into<String>,
    {
        Self {
            rep_index,
            trial_type: trial_type.into(),
            onset,
            level: None,
            stim_file: None,
            duration: None,
            frame_start: None,
            frame_stop: None,
            phase: None,
        }
    }

    /// Returns the capture reference, unless it is absent or marked missing.
    #[must_use]
    pub fn capture_file(&self) -> Option<&str> {
        self.stim_file
            .as_deref()
            .filter(|f| !f.is_empty() && *f != MISSING_STIM_FILE)
    }

    /// Fills the columns that depend on the recorded capture.
    ///
    /// The level is replaced by the capture's own level, and the row spans the
    /// whole capture.
    pub fn annotate_with_capture(&mut self, trace: &VariableTrace, sampling_rate: u32) {
        let frame_count = trace.frame_count();
        self.level = Some(trace.level().to_owned());
        self.frame_start = Some(0);
        self.frame_stop = Some(frame_count);
        self.duration = Some(frames_to_seconds(frame_count, sampling_rate));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_from_levels() {
        assert_eq!(
            Phase::from_levels([Some("w1l1"), Some("w1l1"), Some("w1l1")]),
            Phase::Discovery
        );
        assert_eq!(
            Phase::from_levels([Some("w1l1"), Some("w1l2")]),
            Phase::Practice
        );
        assert_eq!(Phase::from_levels([Some("w1l1")]), Phase::Practice);
        assert_eq!(Phase::from_levels([None, None]), Phase::Practice);
    }

    #[test]
    fn test_capture_file() {
        let mut record = RepetitionRecord::new(0, "gym-retro_game", 1.5);
        assert_eq!(record.capture_file(), None);

        record.stim_file = Some(MISSING_STIM_FILE.to_owned());
        assert_eq!(record.capture_file(), None);

        record.stim_file = Some("sub-01/ses-001/beh/run-01_rep-000.bk2".to_owned());
        assert_eq!(
            record.capture_file(),
            Some("sub-01/ses-001/beh/run-01_rep-000.bk2")
        );
    }

    #[test]
    fn test_annotate_with_capture() {
        let trace = VariableTrace::new("Level1-1")
            .with_signal("score", vec![0_i64; 120])
            .unwrap();
        let mut record = RepetitionRecord::new(2, "gym-retro_game", 30.0);
        record.level = Some("w1l1".to_owned());
        record.annotate_with_capture(&trace, 60);

        assert_eq!(record.level.as_deref(), Some("Level1-1"));
        assert_eq!(record.frame_start, Some(0));
        assert_eq!(record.frame_stop, Some(120));
        assert_eq!(record.duration, Some(2.0));
    }
}

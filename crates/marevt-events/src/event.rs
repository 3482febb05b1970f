//! Discrete gameplay events derived from variable traces.

/// A labeled occurrence within a repetition.
///
/// Extractors produce events with `onset` relative to the repetition start;
/// the composer then shifts them onto the run timeline with [`Event::rebase`].
/// Frame indices always stay relative to the repetition start.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Start time in seconds.
    pub onset: f64,
    /// Length in seconds, `0.0` for point events.
    pub duration: f64,
    /// Category label, possibly hierarchical (e.g. `Kill/stomp`).
    pub trial_type: String,
    pub level: String,
    pub frame_start: usize,
    pub frame_stop: usize,
}

impl Event {
    /// Creates an instantaneous event at `frame`.
    #[must_use]
    pub fn point<T, L>(trial_type: T, level: L, frame: usize, sampling_rate: u32) -> Self
    where
        T: Into<String>,
        L: Into<String>,
    {
        Self {
            onset: frames_to_seconds(frame, sampling_rate),
            duration: 0.0,
            trial_type: trial_type.into(),
            level: level.into(),
            frame_start: frame,
            frame_stop: frame,
        }
    }

    /// Creates an event spanning `frame_start..frame_stop`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `frame_stop < frame_start`.
    #[must_use]
    pub fn interval<T, L>(
        trial_type: T,
        level: L,
        frame_start: usize,
        frame_stop: usize,
        sampling_rate: u32,
    ) -> Self
    where
        T: Into<String>,
        L: Into<String>,
    {
        debug_assert!(frame_stop >= frame_start, "event ends before it starts");
        Self {
            onset: frames_to_seconds(frame_start, sampling_rate),
            duration: frames_to_seconds(frame_stop - frame_start, sampling_rate),
            trial_type: trial_type.into(),
            level: level.into(),
            frame_start,
            frame_stop,
        }
    }

    /// Shifts the onset by `offset` seconds.
    #[must_use]
    pub fn rebase(mut self, offset: f64) -> Self {
        self.onset += offset;
        self
    }
}

/// Converts a frame count into seconds.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn frames_to_seconds(frames: usize, sampling_rate: u32) -> f64 {
    frames as f64 / f64::from(sampling_rate)
}

/// Rounds seconds to the nearest millisecond.
#[must_use]
pub fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

//! Composition of all event categories for one repetition.

use crate::{
    constants::ExtractionConstants,
    event::Event,
    extract::{EventCategory, ExtractionContext, SceneLookup},
    scene::{ClipKey, SceneClipSource},
    trace::{RepetitionCapture, TraceError},
};

/// Extraction failed for one category of one repetition.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("repetition {position}: cannot extract {category} events")]
pub struct ComposeError {
    /// Position of the repetition within the run.
    pub position: usize,
    pub category: EventCategory,
    pub source: TraceError,
}

/// Events of one repetition, placed on the run timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedRepetition {
    /// Start of the repetition within the run, in seconds.
    pub onset: f64,
    /// Events of every category, in extraction order.
    pub events: Vec<Event>,
}

/// Runs every extractor over a repetition and shifts the results onto the
/// run timeline.
pub struct RepetitionComposer<'a> {
    constants: ExtractionConstants,
    sampling_rate: u32,
    scenes: Option<&'a dyn SceneClipSource>,
}

impl std::fmt::Debug for RepetitionComposer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepetitionComposer")
            .field("constants", &self.constants)
            .field("sampling_rate", &self.sampling_rate)
            .field("scenes", &self.scenes.is_some())
            .finish()
    }
}

impl<'a> RepetitionComposer<'a> {
    #[must_use]
    pub fn new(sampling_rate: u32) -> Self {
        Self {
            constants: ExtractionConstants::default(),
            sampling_rate,
            scenes: None,
        }
    }

    #[must_use]
    pub fn with_constants(mut self, constants: ExtractionConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Enables scene events, looked up in `source`.
    #[must_use]
    pub fn with_scenes(mut self, source: &'a dyn SceneClipSource) -> Self {
        self.scenes = Some(source);
        self
    }

    #[must_use]
    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    /// Composes the events of the repetition at `position` in `run`.
    ///
    /// `position` counts repetitions from zero in run order and selects the
    /// scene clips. `onset` is the repetition's start within the run; it is
    /// added to every event onset. A missing capture yields no events.
    pub fn compose(
        &self,
        run: &str,
        position: usize,
        onset: f64,
        capture: &RepetitionCapture,
    ) -> Result<ComposedRepetition, ComposeError> {
        let Some(trace) = capture.as_recorded() else {
            tracing::debug!(run, position, "no capture, no events");
            return Ok(ComposedRepetition {
                onset,
                events: vec![],
            });
        };

        let clip_key = self
            .scenes
            .and(trace.filename())
            .and_then(|filename| ClipKey::from_capture_filename(filename, run, position));
        if self.scenes.is_some() && clip_key.is_none() {
            tracing::debug!(run, position, "capture has no usable filename, skipping scenes");
        }
        let ctx = ExtractionContext {
            trace,
            constants: &self.constants,
            sampling_rate: self.sampling_rate,
            scenes: self
                .scenes
                .zip(clip_key.as_ref())
                .map(|(source, key)| SceneLookup { source, key }),
        };

        let mut events = vec![];
        for category in EventCategory::ALL {
            let extracted = category.extract(&ctx).map_err(|source| ComposeError {
                position,
                category,
                source,
            })?;
            tracing::trace!(run, position, %category, count = extracted.len());
            events.extend(extracted.into_iter().map(|e| e.rebase(onset)));
        }

        Ok(ComposedRepetition { onset, events })
    }
}

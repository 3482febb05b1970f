//! Per-category event extractors.
//!
//! Each extractor scans one or more per-frame signals of a repetition and
//! returns the events of its category, with onsets relative to the repetition
//! start. Extractors run in the fixed order of [`EventCategory::ALL`]; that
//! order decides how simultaneous events are ordered in the final table.

use std::fmt;

use crate::{
    constants::ExtractionConstants,
    event::Event,
    scene::{ClipKey, SceneClipSource},
    trace::{TraceError, VariableTrace},
};

mod actions;
mod bricks;
mod coins;
mod hits;
mod kills;
mod powerups;
mod scenes;

/// Inputs shared by every extractor for one repetition.
#[derive(Clone, Copy)]
pub struct ExtractionContext<'a> {
    pub trace: &'a VariableTrace,
    pub constants: &'a ExtractionConstants,
    pub sampling_rate: u32,
    /// Scene clip lookup, `None` when no clip source is configured.
    pub scenes: Option<SceneLookup<'a>>,
}

impl fmt::Debug for ExtractionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionContext")
            .field("level", &self.trace.level())
            .field("frame_count", &self.trace.frame_count())
            .field("sampling_rate", &self.sampling_rate)
            .field("scenes", &self.scenes.map(|s| s.key))
            .finish_non_exhaustive()
    }
}

/// Where to find the scene clips of the repetition being extracted.
#[derive(Clone, Copy)]
pub struct SceneLookup<'a> {
    pub source: &'a dyn SceneClipSource,
    pub key: &'a ClipKey,
}

type Extractor = fn(&ExtractionContext<'_>) -> Result<Vec<Event>, TraceError>;

/// Event categories, one per extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Actions,
    Kills,
    HitsTaken,
    BricksSmashed,
    Coins,
    Powerups,
    Scenes,
}

impl EventCategory {
    /// All categories, in extraction order.
    pub const ALL: [Self; 7] = [
        Self::Actions,
        Self::Kills,
        Self::HitsTaken,
        Self::BricksSmashed,
        Self::Coins,
        Self::Powerups,
        Self::Scenes,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actions => "actions",
            Self::Kills => "kills",
            Self::HitsTaken => "hits_taken",
            Self::BricksSmashed => "bricks_smashed",
            Self::Coins => "coins",
            Self::Powerups => "powerups",
            Self::Scenes => "scenes",
        }
    }

    fn extractor(self) -> Extractor {
        match self {
            Self::Actions => actions::extract,
            Self::Kills => kills::extract,
            Self::HitsTaken => hits::extract,
            Self::BricksSmashed => bricks::extract,
            Self::Coins => coins::extract,
            Self::Powerups => powerups::extract,
            Self::Scenes => scenes::extract,
        }
    }

    /// Extracts this category's events from a repetition.
    pub fn extract(self, ctx: &ExtractionContext<'_>) -> Result<Vec<Event>, TraceError> {
        (self.extractor())(ctx)
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

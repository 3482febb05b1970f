//! Scene clip descriptors and their lookup by repetition.
//!
//! Scene clips are produced by a separate segmentation step: every traversal
//! of a named scene within a repetition is saved as a JSON descriptor.
//!
//! ```json
//! {
//!   "ClipCode": "0100303015",
//!   "StartFrame": 120,
//!   "EndFrame": 480,
//!   "SceneFullName": "w1l1s2",
//!   "LevelFullName": "w1l1"
//! }
//! ```
//!
//! Descriptors are stored under a directory tree that encodes the subject and
//! session; the descriptor file name encodes the run and, at a fixed position,
//! the zero-padded repetition index.

use serde::{Deserialize, Deserializer};

/// One traversal of a scene within a repetition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SceneClip {
    #[serde(rename = "StartFrame")]
    pub start_frame: usize,
    #[serde(rename = "EndFrame")]
    pub end_frame: usize,
    #[serde(rename = "SceneFullName")]
    pub scene: String,
    #[serde(rename = "ClipCode", deserialize_with = "clip_code")]
    pub code: String,
    #[serde(rename = "LevelFullName")]
    pub level: String,
}

fn clip_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Integer(i64),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(text) => text,
        Code::Integer(value) => value.to_string(),
    })
}

/// Identifies the clips belonging to one repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipKey {
    /// Subject label, e.g. `sub-01`.
    pub subject: String,
    /// Session label, e.g. `ses-001`.
    pub session: String,
    /// Run label, e.g. `run-01`.
    pub run: String,
    /// Repetition index within the run.
    pub repetition: usize,
}

impl ClipKey {
    /// Derives the key from the capture file name of a repetition.
    ///
    /// Subject and session are the first two `_`-separated fields of the file
    /// name (directories are ignored).
    ///
    /// # Examples
    ///
    /// ```
    /// # use marevt_events::scene::ClipKey;
    /// let key = ClipKey::from_capture_filename(
    ///     "sub-01/ses-001/beh/sub-01_ses-001_task-mario_run-02_level-w1l1_rep-000.bk2",
    ///     "run-02",
    ///     3,
    /// )
    /// .unwrap();
    /// assert_eq!(key.subject, "sub-01");
    /// assert_eq!(key.session, "ses-001");
    /// ```
    #[must_use]
    pub fn from_capture_filename(filename: &str, run: &str, repetition: usize) -> Option<Self> {
        let basename = filename.rsplit('/').next()?;
        let mut fields = basename.split('_');
        let subject = fields.next().filter(|s| !s.is_empty())?;
        let session = fields.next().filter(|s| !s.is_empty())?;
        Some(Self {
            subject: subject.to_owned(),
            session: session.to_owned(),
            run: run.to_owned(),
            repetition,
        })
    }

    /// Tests whether a descriptor stored at `directory/file_name` belongs to
    /// this repetition.
    ///
    /// The directory must mention both subject and session, the file name must
    /// mention the run, be a `.json` file, and carry the two-digit repetition
    /// index at characters 5..7 of its last `-`-separated segment.
    #[must_use]
    pub fn matches(&self, directory: &str, file_name: &str) -> bool {
        directory.contains(&self.subject)
            && directory.contains(&self.session)
            && file_name.contains(&self.run)
            && file_name.ends_with(".json")
            && clip_repetition_field(file_name) == Some(format!("{:02}", self.repetition).as_str())
    }
}

/// Returns the repetition field encoded in a clip file name.
fn clip_repetition_field(file_name: &str) -> Option<&str> {
    file_name.rsplit('-').next()?.get(5..7)
}

/// Supplies the scene clips of a repetition.
pub trait SceneClipSource {
    /// Returns the clips matching `key`, in storage order.
    ///
    /// Unmatched keys and unreadable descriptors yield no clips.
    fn clips_for(&self, key: &ClipKey) -> Vec<SceneClip>;
}

/// In-memory collection of clip descriptors with their storage location.
#[derive(Debug, Clone, Default)]
pub struct SceneClipCatalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    directory: String,
    file_name: String,
    clip: SceneClip,
}

impl SceneClipCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<D, F>(&mut self, directory: D, file_name: F, clip: SceneClip)
    where
        D: Into<String>,
        F: Into<String>,
    {
        self.entries.push(CatalogEntry {
            directory: directory.into(),
            file_name: file_name.into(),
            clip,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SceneClipSource for SceneClipCatalog {
    fn clips_for(&self, key: &ClipKey) -> Vec<SceneClip> {
        let mut matching = self
            .entries
            .iter()
            .filter(|e| key.matches(&e.directory, &e.file_name))
            .collect::<Vec<_>>();
        matching.sort_by(|a, b| {
            (&a.directory, &a.file_name).cmp(&(&b.directory, &b.file_name))
        });
        matching.into_iter().map(|e| e.clip.clone()).collect()
    }
}

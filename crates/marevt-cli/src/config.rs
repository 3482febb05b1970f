use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

/// Settings of the `annotate` command read from a YAML file.
///
/// Every key is optional; command-line flags take precedence.
///
/// ```yaml
/// datapath: /data/mario
/// replays_path: /data/mario.replays
/// clips_path: /data/mario.scenes/clips
/// output_path: outputdata/annotated_events
/// subjects: [sub-01, sub-02]
/// sessions: ses-001 ses-002
/// sampling_rate: 60
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AnnotateConfig {
    pub datapath: Option<PathBuf>,
    pub replays_path: Option<PathBuf>,
    pub clips_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub overwrite: bool,
    pub subjects: Option<LabelList>,
    pub sessions: Option<LabelList>,
    pub sampling_rate: Option<u32>,
}

/// A label filter, written either as a YAML list or as one separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum LabelList {
    List(Vec<String>),
    Text(String),
}

impl LabelList {
    pub fn into_labels(self) -> Vec<String> {
        match self {
            LabelList::List(list) => list,
            LabelList::Text(text) => crate::util::split_labels(&text),
        }
    }
}

impl AnnotateConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

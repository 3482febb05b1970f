use std::path::{Path, PathBuf};

use anyhow::Context;
use marevt_events::scene::{ClipKey, SceneClip, SceneClipSource};
use walkdir::WalkDir;

use crate::util;

/// Scene clip descriptors stored as JSON files under a directory tree.
///
/// The tree is listed once; descriptors are parsed when a repetition asks for
/// them.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClipDirectory {
    files: Vec<ClipFile>,
}

#[derive(Debug, Clone)]
struct ClipFile {
    directory: String,
    file_name: String,
    path: PathBuf,
}

impl ClipDirectory {
    pub fn scan(root: &Path) -> anyhow::Result<Self> {
        let mut files = vec![];
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("Failed to walk clips tree: {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            if !file_name.ends_with(".json") {
                continue;
            }
            let directory = entry
                .path()
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            files.push(ClipFile {
                directory,
                file_name: file_name.to_owned(),
                path: entry.path().to_owned(),
            });
        }
        tracing::info!(root = %root.display(), count = files.len(), "indexed scene clips");
        Ok(Self { files })
    }
}

impl SceneClipSource for ClipDirectory {
    fn clips_for(&self, key: &ClipKey) -> Vec<SceneClip> {
        self.files
            .iter()
            .filter(|f| key.matches(&f.directory, &f.file_name))
            .filter_map(
                |f| match util::read_json_file::<SceneClip, _>("scene clip", &f.path) {
                    Ok(clip) => Some(clip),
                    Err(err) => {
                        tracing::warn!("{err:#}");
                        None
                    }
                },
            )
            .collect()
    }
}

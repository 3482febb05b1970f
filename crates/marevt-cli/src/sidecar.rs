//! Game variable sidecars of recorded repetitions.
//!
//! Each `.bk2` capture has a JSON sidecar holding one array per game variable
//! (one value per frame) plus a few descriptive fields. Sidecars live in the
//! replays tree at `<sub>/<ses>/beh/variables/<capture name>.json`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use marevt_events::{
    repetition::RepetitionRecord,
    trace::{RepetitionCapture, VariableTrace},
};
use serde_json::{Map, Value};

use crate::util;

/// Location of the sidecar for a capture reference such as
/// `sub-01/ses-001/beh/sub-01_ses-001_task-mario_run-01_level-w1l1_rep-000.bk2`.
///
/// Returns `None` when the reference does not start with subject and session
/// directories.
pub(crate) fn sidecar_path(replays_path: &Path, stim_file: &str) -> Option<PathBuf> {
    let mut parts = stim_file.split('/');
    let subject = parts.next().filter(|s| !s.is_empty())?;
    let session = parts.next().filter(|s| !s.is_empty())?;
    let file_name = parts.last().filter(|s| !s.is_empty())?;
    Some(
        replays_path
            .join(subject)
            .join(session)
            .join("beh")
            .join("variables")
            .join(file_name.replace(".bk2", ".json")),
    )
}

pub(crate) fn read_trace(path: &Path) -> anyhow::Result<VariableTrace> {
    let map = util::read_json_file::<Map<String, Value>, _>("variables sidecar", path)?;
    VariableTrace::from_json_map(&map)
        .with_context(|| format!("Invalid variables sidecar: {}", path.display()))
}

/// Loads the capture of a repetition row.
///
/// Rows without a usable capture reference, and references whose sidecar does
/// not exist, are missing captures. A sidecar that exists but cannot be read is
/// an error.
pub(crate) fn load_capture(
    replays_path: &Path,
    record: &RepetitionRecord,
) -> anyhow::Result<RepetitionCapture> {
    let Some(stim_file) = record.capture_file() else {
        tracing::debug!(rep_index = record.rep_index, "no capture file, skipping");
        return Ok(RepetitionCapture::Missing);
    };
    let Some(path) = sidecar_path(replays_path, stim_file) else {
        tracing::warn!(stim_file, "capture reference has no subject/session, skipping");
        return Ok(RepetitionCapture::Missing);
    };
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "variables sidecar not found, skipping");
        return Ok(RepetitionCapture::Missing);
    }

    tracing::debug!(path = %path.display(), "adding capture");
    let mut trace = read_trace(&path)?;
    if trace.filename().is_none() {
        trace = trace.with_filename(stim_file);
    }
    Ok(RepetitionCapture::Recorded(trace))
}

//! Dataset layout: run events files and their annotated counterparts.

use std::path::{Path, PathBuf};

use anyhow::Context;
use marevt_events::repetition::RepetitionRecord;
use walkdir::WalkDir;

/// Trial type of repetition rows in a run events file.
pub(crate) const REPETITION_TRIAL_TYPE: &str = "gym-retro_game";

const SOURCEDATA: &str = "sourcedata";

/// A run events file found in the dataset.
///
/// File names follow the BIDS pattern
/// `sub-<label>_ses-<label>_task-<label>_run-<label>_events.tsv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunEventsFile {
    pub path: PathBuf,
    pub file_name: String,
    pub subject: String,
    pub session: String,
    pub run: String,
}

impl RunEventsFile {
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let fields = file_name.split('_').collect::<Vec<_>>();
        let (subject, session, run) = match fields.as_slice() {
            [subject, session, _, run, ..] => (*subject, *session, *run),
            _ => return None,
        };
        Some(Self {
            path: path.to_owned(),
            file_name: file_name.to_owned(),
            subject: subject.to_owned(),
            session: session.to_owned(),
            run: run.to_owned(),
        })
    }

    /// Location of the annotated events file under `output_root`.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        output_root
            .join(&self.subject)
            .join(&self.session)
            .join("func")
            .join(
                self.file_name
                    .replace("_events.", "_desc-annotated_events."),
            )
    }
}

fn is_run_events_file(file_name: &str) -> bool {
    file_name.contains("events.tsv") && !file_name.contains("annotated")
}

/// Finds every run events file under `datapath`, in path order.
///
/// Directories whose name mentions `sourcedata` are not entered. Events files
/// whose name does not carry subject, session, task and run fields are
/// skipped with a warning.
pub(crate) fn discover_runs(datapath: &Path) -> anyhow::Result<Vec<RunEventsFile>> {
    let walker = WalkDir::new(datapath)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !e.file_name().to_string_lossy().contains(SOURCEDATA)
        });

    let mut runs = vec![];
    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to walk dataset: {}", datapath.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if !is_run_events_file(file_name) {
            continue;
        }
        match RunEventsFile::from_path(entry.path()) {
            Some(run) => runs.push(run),
            None => tracing::warn!(
                path = %entry.path().display(),
                "events file name has no run field, skipping"
            ),
        }
    }
    Ok(runs)
}

/// Reads the repetition rows of a run events file.
///
/// Only rows whose `trial_type` is `gym-retro_game` are kept. When the first
/// column has no name it holds the repetition index; otherwise repetitions are
/// numbered by position. Empty and `n/a` cells are read as absent.
pub(crate) fn read_repetitions(path: &Path) -> anyhow::Result<Vec<RepetitionRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("Failed to open events file: {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of events file: {}", path.display()))?
        .clone();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let trial_type_col = column("trial_type")
        .with_context(|| format!("Events file has no `trial_type` column: {}", path.display()))?;
    let onset_col = column("onset")
        .with_context(|| format!("Events file has no `onset` column: {}", path.display()))?;
    let level_col = column("level");
    let stim_file_col = column("stim_file");
    let index_col = headers.get(0).filter(|h| h.is_empty()).map(|_| 0);

    let mut records = vec![];
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| {
            format!("Failed to read row {} of events file: {}", line + 1, path.display())
        })?;
        if row.get(trial_type_col) != Some(REPETITION_TRIAL_TYPE) {
            continue;
        }

        let rep_index = match index_col.and_then(|col| cell(&row, col)) {
            Some(text) => text.parse::<usize>().with_context(|| {
                format!(
                    "Invalid repetition index `{text}` at row {} of {}",
                    line + 1,
                    path.display()
                )
            })?,
            None => records.len(),
        };
        let onset = cell(&row, onset_col)
            .with_context(|| format!("Missing onset at row {} of {}", line + 1, path.display()))?;
        let onset = onset.parse::<f64>().with_context(|| {
            format!(
                "Invalid onset `{onset}` at row {} of {}",
                line + 1,
                path.display()
            )
        })?;

        let mut record = RepetitionRecord::new(rep_index, REPETITION_TRIAL_TYPE, onset);
        record.level = level_col.and_then(|col| cell(&row, col)).map(str::to_owned);
        record.stim_file = stim_file_col
            .and_then(|col| cell(&row, col))
            .map(str::to_owned);
        records.push(record);
    }
    Ok(records)
}

fn cell(row: &csv::StringRecord, col: usize) -> Option<&str> {
    row.get(col)
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "n/a")
}

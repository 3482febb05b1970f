//! The run-level event table and its tab-separated serialization.

use std::io;

use crate::{
    event::Event,
    repetition::{Phase, RepetitionRecord},
};

/// Value written for absent cells.
pub const NOT_AVAILABLE: &str = "n/a";

/// Column names, in output order.
///
/// The first six columns are shared by every row; the remaining ones are only
/// filled on repetition rows.
pub const COLUMNS: [&str; 9] = [
    "onset",
    "duration",
    "trial_type",
    "level",
    "frame_start",
    "frame_stop",
    "rep_index",
    "stim_file",
    "phase",
];

/// A row of the run table.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEventRow {
    Repetition(RepetitionRecord),
    Event(Event),
}

impl RunEventRow {
    #[must_use]
    pub fn onset(&self) -> f64 {
        match self {
            Self::Repetition(record) => record.onset,
            Self::Event(event) => event.onset,
        }
    }

    #[must_use]
    pub fn trial_type(&self) -> &str {
        match self {
            Self::Repetition(record) => &record.trial_type,
            Self::Event(event) => &event.trial_type,
        }
    }

    fn cells(&self) -> [Option<String>; 9] {
        match self {
            Self::Repetition(r) => [
                Some(r.onset.to_string()),
                r.duration.map(|d| d.to_string()),
                Some(r.trial_type.clone()),
                r.level.clone(),
                r.frame_start.map(|f| f.to_string()),
                r.frame_stop.map(|f| f.to_string()),
                Some(r.rep_index.to_string()),
                r.stim_file.clone(),
                r.phase.map(|p| Phase::as_str(p).to_owned()),
            ],
            Self::Event(e) => [
                Some(e.onset.to_string()),
                Some(e.duration.to_string()),
                Some(e.trial_type.clone()),
                Some(e.level.clone()),
                Some(e.frame_start.to_string()),
                Some(e.frame_stop.to_string()),
                None,
                None,
                None,
            ],
        }
    }
}

/// All repetition rows and derived events of a run, ordered by onset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunEventTable {
    rows: Vec<RunEventRow>,
}

impl RunEventTable {
    /// Concatenates the repetition rows with each repetition's events and
    /// sorts the result by onset.
    ///
    /// The sort is stable: rows with equal onsets keep their concatenation
    /// order, so repetition rows come before events, and events keep their
    /// repetition and category order.
    #[must_use]
    pub fn merge<I>(records: Vec<RepetitionRecord>, repetitions: I) -> Self
    where
        I: IntoIterator<Item = Vec<Event>>,
    {
        let mut rows = records
            .into_iter()
            .map(RunEventRow::Repetition)
            .collect::<Vec<_>>();
        for events in repetitions {
            rows.extend(events.into_iter().map(RunEventRow::Event));
        }
        rows.sort_by(|a, b| a.onset().total_cmp(&b.onset()));
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[RunEventRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of derived (non-repetition) events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r, RunEventRow::Event(_)))
            .count()
    }

    /// Writes the table as tab-separated values with a header line.
    ///
    /// An empty table is written as the header alone.
    pub fn write_tsv<W>(&self, writer: W) -> Result<(), csv::Error>
    where
        W: io::Write,
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        writer.write_record(COLUMNS)?;
        for row in &self.rows {
            writer.write_record(
                row.cells()
                    .iter()
                    .map(|cell| cell.as_deref().unwrap_or(NOT_AVAILABLE)),
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Serializes the table into a byte buffer.
    pub fn to_tsv_bytes(&self) -> Result<Vec<u8>, csv::Error> {
        let mut buf = vec![];
        self.write_tsv(&mut buf)?;
        Ok(buf)
    }
}

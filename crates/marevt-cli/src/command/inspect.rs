use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use marevt_events::{
    constants::{DEFAULT_SAMPLING_RATE, ExtractionConstants},
    event::frames_to_seconds,
    extract::{EventCategory, ExtractionContext},
    trace::VariableTrace,
};

use crate::{sidecar, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Game variables sidecar of one repetition
    sidecar: PathBuf,
    /// Frames per second of the capture
    #[arg(long, default_value_t = DEFAULT_SAMPLING_RATE)]
    sampling_rate: u32,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.sampling_rate > 0, "Sampling rate must be positive");
    let trace = sidecar::read_trace(&arg.sidecar)?;
    let mut output = Output::from_output_path(arg.output.clone())?;
    write_report(&mut output, &trace, arg.sampling_rate)
        .with_context(|| format!("Failed to write report to {}", output.display_path()))?;
    output.flush()?;
    Ok(())
}

/// Writes the level, length and per-category event counts of a capture.
///
/// Scene clips are not looked up, so the scenes count is always zero.
fn write_report<W>(writer: &mut W, trace: &VariableTrace, sampling_rate: u32) -> anyhow::Result<()>
where
    W: std::io::Write,
{
    let constants = ExtractionConstants::default();
    let ctx = ExtractionContext {
        trace,
        constants: &constants,
        sampling_rate,
        scenes: None,
    };

    writeln!(writer, "level\t{}", trace.level())?;
    if let Some(filename) = trace.filename() {
        writeln!(writer, "filename\t{filename}")?;
    }
    writeln!(
        writer,
        "frames\t{} ({:.3} s)",
        trace.frame_count(),
        frames_to_seconds(trace.frame_count(), sampling_rate)
    )?;
    for category in EventCategory::ALL {
        match category.extract(&ctx) {
            Ok(events) => writeln!(writer, "{category}\t{}", events.len())?,
            Err(err) => writeln!(writer, "{category}\terror: {err}")?,
        }
    }
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::Context;
use marevt_events::{
    compose::RepetitionComposer, constants::DEFAULT_SAMPLING_RATE, run::annotate_run,
};

use crate::{
    clips::ClipDirectory,
    config::{AnnotateConfig, LabelList},
    dataset::{self, RunEventsFile},
    sidecar,
    util::{self, Output},
};

const DEFAULT_OUTPUT_PATH: &str = "outputdata/annotated_events";

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AnnotateArg {
    /// Dataset root to search for run events files [default: .]
    #[arg(short, long)]
    datapath: Option<PathBuf>,
    /// Replays tree holding the game variable sidecars
    #[arg(short, long)]
    replays_path: Option<PathBuf>,
    /// Scene clips tree; scene events are only produced when set
    #[arg(short, long)]
    clips_path: Option<PathBuf>,
    /// Where to write annotated events files [default: outputdata/annotated_events]
    #[arg(short, long)]
    output_path: Option<PathBuf>,
    /// Rewrite annotated files that already exist
    #[arg(long)]
    overwrite: bool,
    /// Subjects to process, space or comma separated (e.g. "sub-01 sub-02")
    #[arg(long)]
    subjects: Option<String>,
    /// Sessions to process, space or comma separated (e.g. "ses-001,ses-002")
    #[arg(long)]
    sessions: Option<String>,
    /// Frames per second of the captures [default: 60]
    #[arg(long)]
    sampling_rate: Option<u32>,
    /// YAML file providing defaults for the options above
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Options after merging the command line over the config file.
#[derive(Debug, Clone, PartialEq)]
struct AnnotateSettings {
    datapath: PathBuf,
    replays_path: PathBuf,
    clips_path: Option<PathBuf>,
    output_path: PathBuf,
    overwrite: bool,
    subjects: Vec<String>,
    sessions: Vec<String>,
    sampling_rate: u32,
}

impl AnnotateSettings {
    fn resolve(arg: &AnnotateArg, config: AnnotateConfig) -> anyhow::Result<Self> {
        let replays_path = arg
            .replays_path
            .clone()
            .or(config.replays_path)
            .context("No replays path given (use --replays-path or `replays_path` in the config file)")?;
        let subjects = match &arg.subjects {
            Some(text) => util::split_labels(text),
            None => config.subjects.map(LabelList::into_labels).unwrap_or_default(),
        };
        let sessions = match &arg.sessions {
            Some(text) => util::split_labels(text),
            None => config.sessions.map(LabelList::into_labels).unwrap_or_default(),
        };
        let sampling_rate = arg
            .sampling_rate
            .or(config.sampling_rate)
            .unwrap_or(DEFAULT_SAMPLING_RATE);
        anyhow::ensure!(sampling_rate > 0, "Sampling rate must be positive");

        Ok(Self {
            datapath: arg
                .datapath
                .clone()
                .or(config.datapath)
                .unwrap_or_else(|| PathBuf::from(".")),
            replays_path,
            clips_path: arg.clips_path.clone().or(config.clips_path),
            output_path: arg
                .output_path
                .clone()
                .or(config.output_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            overwrite: arg.overwrite || config.overwrite,
            subjects: subjects
                .iter()
                .map(|s| util::with_entity_prefix("sub-", s))
                .collect(),
            sessions: sessions
                .iter()
                .map(|s| util::with_entity_prefix("ses-", s))
                .collect(),
            sampling_rate,
        })
    }

    fn selects(&self, run: &RunEventsFile) -> bool {
        (self.subjects.is_empty() || self.subjects.contains(&run.subject))
            && (self.sessions.is_empty() || self.sessions.contains(&run.session))
    }
}

#[derive(Debug, Default)]
struct Summary {
    written: usize,
    skipped: usize,
    failed: usize,
}

pub(crate) fn run(arg: &AnnotateArg) -> anyhow::Result<()> {
    let config = match &arg.config {
        Some(path) => AnnotateConfig::load(path)?,
        None => AnnotateConfig::default(),
    };
    let settings = AnnotateSettings::resolve(arg, config)?;
    if settings.datapath == Path::new(".") {
        tracing::info!("no data path given, searching the current directory");
    }
    tracing::info!(datapath = %settings.datapath.display(), "generating annotations");

    let clips = settings
        .clips_path
        .as_deref()
        .map(ClipDirectory::scan)
        .transpose()?;
    let mut composer = RepetitionComposer::new(settings.sampling_rate);
    if let Some(clips) = &clips {
        composer = composer.with_scenes(clips);
    }

    let runs = dataset::discover_runs(&settings.datapath)?;
    let mut summary = Summary::default();
    for run in runs.iter().filter(|run| settings.selects(run)) {
        let output_path = run.output_path(&settings.output_path);
        if output_path.exists() && !settings.overwrite {
            tracing::debug!(output = %output_path.display(), "annotated file exists, skipping");
            summary.skipped += 1;
            continue;
        }

        tracing::info!(file = %run.file_name, "processing");
        match annotate_file(&composer, &settings, run, output_path) {
            Ok(()) => summary.written += 1,
            Err(err) => {
                tracing::error!(file = %run.path.display(), "{err:#}");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        written = summary.written,
        skipped = summary.skipped,
        failed = summary.failed,
        "done"
    );
    anyhow::ensure!(
        summary.failed == 0,
        "{} of {} runs failed",
        summary.failed,
        summary.written + summary.failed
    );
    Ok(())
}

fn annotate_file(
    composer: &RepetitionComposer<'_>,
    settings: &AnnotateSettings,
    run: &RunEventsFile,
    output_path: PathBuf,
) -> anyhow::Result<()> {
    let records = dataset::read_repetitions(&run.path)?;
    let captures = records
        .iter()
        .map(|record| sidecar::load_capture(&settings.replays_path, record))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let missing = captures
        .iter()
        .filter(|c| c.is_missing())
        .count();
    if missing > 0 {
        tracing::warn!(run = %run.run, missing, "repetitions without capture");
    }

    let table = annotate_run(composer, &run.run, records, &captures)
        .with_context(|| format!("Failed to annotate {}", run.path.display()))?;

    let mut output = Output::open(output_path)?;
    output.write_tsv(&table)?;
    tracing::info!(
        output = %output.display_path(),
        rows = table.len(),
        events = table.event_count(),
        "written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg() -> AnnotateArg {
        AnnotateArg {
            replays_path: Some(PathBuf::from("replays")),
            ..AnnotateArg::default()
        }
    }

    fn run_file(name: &str) -> RunEventsFile {
        RunEventsFile::from_path(Path::new(name)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = AnnotateSettings::resolve(&arg(), AnnotateConfig::default()).unwrap();
        assert_eq!(settings.datapath, PathBuf::from("."));
        assert_eq!(settings.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(settings.sampling_rate, 60);
        assert!(!settings.overwrite);
        assert!(settings.clips_path.is_none());
    }

    #[test]
    fn test_replays_path_is_required() {
        assert!(
            AnnotateSettings::resolve(&AnnotateArg::default(), AnnotateConfig::default()).is_err()
        );
    }

    #[test]
    fn test_command_line_overrides_config() {
        let config = AnnotateConfig {
            datapath: Some(PathBuf::from("/data/mario")),
            replays_path: Some(PathBuf::from("/data/replays")),
            subjects: Some(LabelList::List(vec!["sub-01".to_owned()])),
            sampling_rate: Some(30),
            ..AnnotateConfig::default()
        };
        let arg = AnnotateArg {
            subjects: Some("02 03".to_owned()),
            ..arg()
        };
        let settings = AnnotateSettings::resolve(&arg, config).unwrap();
        assert_eq!(settings.datapath, PathBuf::from("/data/mario"));
        assert_eq!(settings.replays_path, PathBuf::from("replays"));
        assert_eq!(settings.subjects, ["sub-02", "sub-03"]);
        assert_eq!(settings.sampling_rate, 30);
    }

    #[test]
    fn test_zero_sampling_rate_is_rejected() {
        let arg = AnnotateArg {
            sampling_rate: Some(0),
            ..arg()
        };
        assert!(AnnotateSettings::resolve(&arg, AnnotateConfig::default()).is_err());
    }

    #[test]
    fn test_selects() {
        let filtered = AnnotateArg {
            subjects: Some("sub-01".to_owned()),
            sessions: Some("001,002".to_owned()),
            ..arg()
        };
        let settings = AnnotateSettings::resolve(&filtered, AnnotateConfig::default()).unwrap();
        assert!(settings.selects(&run_file("sub-01_ses-002_task-mario_run-01_events.tsv")));
        assert!(!settings.selects(&run_file("sub-02_ses-001_task-mario_run-01_events.tsv")));
        assert!(!settings.selects(&run_file("sub-01_ses-003_task-mario_run-01_events.tsv")));

        let all = AnnotateSettings::resolve(&arg(), AnnotateConfig::default()).unwrap();
        assert!(all.selects(&run_file("sub-05_ses-010_task-mario_run-04_events.tsv")));
    }
}

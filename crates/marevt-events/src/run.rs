//! End-to-end annotation of one run.

use crate::{
    compose::{ComposeError, RepetitionComposer},
    merge::RunEventTable,
    repetition::{Phase, RepetitionRecord},
    trace::RepetitionCapture,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AnnotateError {
    #[display("{records} repetition rows but {captures} captures")]
    #[from(ignore)]
    RepetitionCountMismatch { records: usize, captures: usize },
    #[display("cannot compose run events")]
    Compose(ComposeError),
}

/// Annotates a run.
///
/// `records` are the repetition rows of the run's events file and `captures`
/// the matching captures, aligned by position. Rows with a recorded capture
/// get their level, frame span and duration from it; every row gets the run
/// phase. Scene clips are looked up by the repetition's position in the run,
/// not by its `rep_index`. The result holds the repetition rows and all
/// derived events, ordered by onset.
pub fn annotate_run(
    composer: &RepetitionComposer<'_>,
    run: &str,
    mut records: Vec<RepetitionRecord>,
    captures: &[RepetitionCapture],
) -> Result<RunEventTable, AnnotateError> {
    if records.len() != captures.len() {
        return Err(AnnotateError::RepetitionCountMismatch {
            records: records.len(),
            captures: captures.len(),
        });
    }

    for (record, capture) in records.iter_mut().zip(captures) {
        if let Some(trace) = capture.as_recorded() {
            record.annotate_with_capture(trace, composer.sampling_rate());
        }
    }
    let phase = Phase::from_levels(records.iter().map(|r| r.level.as_deref()));
    for record in &mut records {
        record.phase = Some(phase);
    }

    let repetitions = records
        .iter()
        .zip(captures)
        .enumerate()
        .map(|(position, (record, capture))| {
            composer
                .compose(run, position, record.onset, capture)
                .map(|composed| composed.events)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let table = RunEventTable::merge(records, repetitions);
    if table.is_empty() {
        tracing::info!(run, "no repetitions in run, table is empty");
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compose::tests::{quiet_trace, set_signal},
        merge::RunEventRow,
        scene::{SceneClip, SceneClipCatalog},
        trace::VariableTrace,
    };

    fn record(rep_index: usize, onset: f64, stim_file: &str) -> RepetitionRecord {
        let mut record = RepetitionRecord::new(rep_index, "gym-retro_game", onset);
        record.level = Some("w1l1".to_owned());
        record.stim_file = Some(stim_file.to_owned());
        record
    }

    fn scenario() -> (Vec<RepetitionRecord>, Vec<RepetitionCapture>) {
        let trace = quiet_trace(8);
        let trace = set_signal(trace, "RIGHT", &[0, 0, 1, 1, 1, 0, 0, 0]);
        let trace = set_signal(trace, "coins", &[0, 0, 0, 0, 0, 0, 1, 1]);
        (
            vec![
                record(0, 2.0, "sub-01/ses-001/beh/rep-000.bk2"),
                record(1, 40.0, "Missing file"),
            ],
            vec![RepetitionCapture::Recorded(trace), RepetitionCapture::Missing],
        )
    }

    #[test]
    fn test_two_repetitions_one_missing() {
        let (records, captures) = scenario();
        let composer = RepetitionComposer::new(1);
        let table = annotate_run(&composer, "run-01", records, &captures).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.event_count(), 2);
        let labels = table
            .rows()
            .iter()
            .map(RunEventRow::trial_type)
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            ["gym-retro_game", "RIGHT", "Coin_collected", "gym-retro_game"]
        );
        for pair in table.rows().windows(2) {
            assert!(pair[0].onset() <= pair[1].onset());
        }

        let RunEventRow::Repetition(first) = &table.rows()[0] else {
            panic!("expected a repetition row");
        };
        assert_eq!(first.level.as_deref(), Some("Level1-1"));
        assert_eq!(first.frame_stop, Some(8));
        assert_eq!(first.phase, Some(Phase::Practice));

        let RunEventRow::Repetition(last) = &table.rows()[3] else {
            panic!("expected a repetition row");
        };
        assert_eq!(last.level.as_deref(), Some("w1l1"));
        assert_eq!(last.frame_stop, None);
    }

    #[test]
    fn test_scenes_follow_position_not_rep_index() {
        let clip = |code: &str| SceneClip {
            start_frame: 1,
            end_frame: 3,
            scene: "w1l1s1".to_owned(),
            code: code.to_owned(),
            level: "w1l1".to_owned(),
        };
        let mut catalog = SceneClipCatalog::new();
        catalog.insert(
            "clips/sub-01/ses-001",
            "sub-01_ses-001_task-mario_run-01_clip-0100101001.json",
            clip("0100101001"),
        );
        catalog.insert(
            "clips/sub-01/ses-001",
            "sub-01_ses-001_task-mario_run-01_clip-0100102001.json",
            clip("0100102001"),
        );

        // A non-game row between the two repetitions leaves a gap in rep_index.
        let records = vec![
            record(0, 0.0, "Missing file"),
            record(2, 30.0, "sub-01/ses-001/beh/rep-002.bk2"),
        ];
        let captures = vec![
            RepetitionCapture::Missing,
            RepetitionCapture::Recorded(quiet_trace(6)),
        ];
        let composer = RepetitionComposer::new(1).with_scenes(&catalog);
        let table = annotate_run(&composer, "run-01", records, &captures).unwrap();

        let scenes = table
            .rows()
            .iter()
            .map(RunEventRow::trial_type)
            .filter(|t| t.starts_with("scene-"))
            .collect::<Vec<_>>();
        assert_eq!(scenes, ["scene-w1l1s1_code-0100101001"]);

        let RunEventRow::Repetition(second) = &table.rows()[1] else {
            panic!("expected a repetition row");
        };
        assert_eq!(second.rep_index, 2);
    }

    #[test]
    fn test_compose_error_converts() {
        let trace = VariableTrace::new("Level1-1")
            .with_signal("A", vec![0, 1, 0])
            .unwrap();
        let composer = RepetitionComposer::new(60);
        let err = annotate_run(
            &composer,
            "run-01",
            vec![record(4, 0.0, "sub-01/ses-001/beh/rep-004.bk2")],
            &[RepetitionCapture::Recorded(trace)],
        )
        .unwrap_err();
        assert!(matches!(err, AnnotateError::Compose(ref e) if e.position == 0));
    }

    #[test]
    fn test_output_is_reproducible() {
        let composer = RepetitionComposer::new(60);
        let (records, captures) = scenario();
        let first = annotate_run(&composer, "run-01", records, &captures)
            .unwrap()
            .to_tsv_bytes()
            .unwrap();
        let (records, captures) = scenario();
        let second = annotate_run(&composer, "run-01", records, &captures)
            .unwrap()
            .to_tsv_bytes()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_captures_missing() {
        let composer = RepetitionComposer::new(60);
        let records = vec![record(0, 0.0, "Missing file"), record(1, 30.0, "Missing file")];
        let captures = vec![RepetitionCapture::Missing, RepetitionCapture::Missing];
        let table = annotate_run(&composer, "run-01", records, &captures).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.event_count(), 0);
    }

    #[test]
    fn test_empty_run() {
        let composer = RepetitionComposer::new(60);
        let table = annotate_run(&composer, "run-01", vec![], &[]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_count_mismatch() {
        let composer = RepetitionComposer::new(60);
        let records = vec![record(0, 0.0, "Missing file")];
        let err = annotate_run(&composer, "run-01", records, &[]).unwrap_err();
        assert!(matches!(
            err,
            AnnotateError::RepetitionCountMismatch {
                records: 1,
                captures: 0
            }
        ));
    }
}

//! Button presses.

use marevt_signal::edge::Edges;

use super::ExtractionContext;
use crate::{
    constants::Button,
    event::{Event, frames_to_seconds, round_millis},
    trace::TraceError,
};

/// One interval event per press of each button, labeled with the button name.
///
/// Onsets and durations are rounded to milliseconds. Surplus presses or
/// releases that cannot be paired are dropped with a warning; with the forced
/// inactive boundary frames of [`Edges::detect`] this does not happen for
/// recorded traces.
pub(super) fn extract(ctx: &ExtractionContext<'_>) -> Result<Vec<Event>, TraceError> {
    let mut events = vec![];
    for button in Button::ALL {
        let values = ctx.trace.signal(button.as_str())?;
        let pairing = Edges::detect(values.iter().copied()).pair();
        if pairing.unmatched > 0 {
            tracing::warn!(
                %button,
                unmatched = pairing.unmatched,
                "press and release counts differ; keeping completed presses only"
            );
        }
        events.extend(pairing.presses.into_iter().map(|press| {
            let onset = round_millis(frames_to_seconds(press.start, ctx.sampling_rate));
            let release = round_millis(frames_to_seconds(press.stop, ctx.sampling_rate));
            Event {
                onset,
                duration: round_millis(release - onset),
                trial_type: button.as_str().to_owned(),
                level: ctx.trace.level().to_owned(),
                frame_start: press.start,
                frame_stop: press.stop,
            }
        }));
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use crate::{
        constants::Button,
        extract::{
            EventCategory,
            test_util::{extract_at_1hz, labels},
        },
        trace::VariableTrace,
    };

    fn trace_with(button: Button, values: &[i64]) -> VariableTrace {
        let mut trace = VariableTrace::new("Level1-1");
        for b in Button::ALL {
            let signal = if b == button {
                values.to_vec()
            } else {
                vec![0; values.len()]
            };
            trace = trace.with_signal(b.as_str(), signal).unwrap();
        }
        trace
    }

    #[test]
    fn test_two_presses() {
        let trace = trace_with(Button::A, &[0, 0, 1, 1, 1, 0, 0, 1, 0, 0]);
        let events = extract_at_1hz(EventCategory::Actions, &trace);

        assert_eq!(labels(&events), ["A", "A"]);
        assert_eq!((events[0].frame_start, events[0].frame_stop), (1, 4));
        assert!((events[0].onset - 1.0).abs() < f64::EPSILON);
        assert!((events[0].duration - 3.0).abs() < f64::EPSILON);
        assert_eq!((events[1].frame_start, events[1].frame_stop), (6, 7));
        assert!((events[1].duration - 1.0).abs() < f64::EPSILON);
        for event in &events {
            assert!(event.duration >= 0.0);
            assert!(event.frame_stop >= event.frame_start);
            assert_eq!(event.level, "Level1-1");
        }
    }

    #[test]
    fn test_press_held_through_recording() {
        let trace = trace_with(Button::Right, &[1, 1, 1, 1, 1]);
        let events = extract_at_1hz(EventCategory::Actions, &trace);
        assert_eq!(labels(&events), ["RIGHT"]);
        assert_eq!((events[0].frame_start, events[0].frame_stop), (0, 3));
    }

    #[test]
    fn test_button_order() {
        let mut trace = VariableTrace::new("Level1-1");
        for b in Button::ALL {
            trace = trace.with_signal(b.as_str(), vec![0, 1, 0]).unwrap();
        }
        let events = extract_at_1hz(EventCategory::Actions, &trace);
        assert_eq!(
            labels(&events),
            ["UP", "DOWN", "LEFT", "RIGHT", "A", "B", "START", "SELECT"]
        );
    }

    #[test]
    fn test_never_pressed() {
        let trace = trace_with(Button::B, &[0, 0, 0]);
        assert!(extract_at_1hz(EventCategory::Actions, &trace).is_empty());
    }

    #[test]
    fn test_millisecond_rounding() {
        let trace = trace_with(Button::Start, &[0, 1, 0]);
        let constants = crate::constants::ExtractionConstants::default();
        let ctx = crate::extract::ExtractionContext {
            trace: &trace,
            constants: &constants,
            sampling_rate: 60,
            scenes: None,
        };
        let events = EventCategory::Actions.extract(&ctx).unwrap();
        assert!((events[0].onset - 0.0).abs() < f64::EPSILON);
        assert!((events[0].duration - 0.017).abs() < 1e-12);
    }

    #[test]
    fn test_missing_button_is_an_error() {
        let trace = VariableTrace::new("Level1-1")
            .with_signal("A", vec![0, 1, 0])
            .unwrap();
        let constants = crate::constants::ExtractionConstants::default();
        let ctx = crate::extract::ExtractionContext {
            trace: &trace,
            constants: &constants,
            sampling_rate: 60,
            scenes: None,
        };
        assert!(EventCategory::Actions.extract(&ctx).is_err());
    }
}

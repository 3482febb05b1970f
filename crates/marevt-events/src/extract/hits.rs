//! Hits taken: powerups and lives lost.

use marevt_signal::delta::deltas;

use super::ExtractionContext;
use crate::{constants::variable, event::Event, trace::TraceError};

const POWERUP_LOST: &str = "Hit/powerup_lost";
const LIFE_LOST: &str = "Hit/life_lost";

/// Point events for every powerup lost, then for every life lost.
///
/// A powerup loss shows as a large negative jump of `powerstate`; small
/// decreases belong to other state changes and are not hits.
pub(super) fn extract(ctx: &ExtractionContext<'_>) -> Result<Vec<Event>, TraceError> {
    let powerstate = ctx.trace.signal(variable::POWERSTATE)?;
    let lives = ctx.trace.signal(variable::LIVES)?;
    let threshold = ctx.constants.power_loss_threshold;

    let point = |label: &str, frame| {
        Event::point(label, ctx.trace.level(), frame, ctx.sampling_rate)
    };
    let powerups_lost = deltas(powerstate)
        .filter(|&(_, delta)| delta < threshold)
        .map(|(frame, _)| point(POWERUP_LOST, frame));
    let lives_lost = deltas(lives)
        .filter(|&(_, delta)| delta < 0)
        .map(|(frame, _)| point(LIFE_LOST, frame));
    Ok(powerups_lost.chain(lives_lost).collect())
}

#[cfg(test)]
mod tests {
    use crate::{
        extract::{
            EventCategory,
            test_util::{extract_at_1hz, frames, labels},
        },
        trace::VariableTrace,
    };

    fn trace_with(powerstate: &[i64], lives: &[i64]) -> VariableTrace {
        VariableTrace::new("Level1-1")
            .with_signal("powerstate", powerstate.to_vec())
            .unwrap()
            .with_signal("lives", lives.to_vec())
            .unwrap()
    }

    #[test]
    fn test_powerup_lost_needs_large_drop() {
        let trace = trace_with(&[32_768, 32_768, 0, 0, -100], &[2; 5]);
        let events = extract_at_1hz(EventCategory::HitsTaken, &trace);
        assert_eq!(labels(&events), ["Hit/powerup_lost"]);
        assert_eq!(frames(&events), [1]);
    }

    #[test]
    fn test_drop_at_threshold_is_not_a_hit() {
        let trace = trace_with(&[10_000, 0, -1, 10_001, 0], &[2; 5]);
        let events = extract_at_1hz(EventCategory::HitsTaken, &trace);
        assert_eq!(frames(&events), [3]);
    }

    #[test]
    fn test_life_lost() {
        let trace = trace_with(&[0; 6], &[3, 3, 2, 2, 1, 1]);
        let events = extract_at_1hz(EventCategory::HitsTaken, &trace);
        assert_eq!(labels(&events), ["Hit/life_lost", "Hit/life_lost"]);
        assert_eq!(frames(&events), [1, 3]);
    }

    #[test]
    fn test_powerups_listed_before_lives() {
        let trace = trace_with(&[0, 0, 0, 20_000, 0], &[2, 1, 1, 1, 1]);
        let events = extract_at_1hz(EventCategory::HitsTaken, &trace);
        assert_eq!(labels(&events), ["Hit/powerup_lost", "Hit/life_lost"]);
        assert_eq!(frames(&events), [3, 0]);
    }

    #[test]
    fn test_life_gained_is_not_a_hit() {
        let trace = trace_with(&[0; 3], &[1, 2, 2]);
        assert!(extract_at_1hz(EventCategory::HitsTaken, &trace).is_empty());
    }
}

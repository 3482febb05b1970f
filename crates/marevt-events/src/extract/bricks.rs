//! Bricks smashed.

use marevt_signal::delta::deltas;

use super::ExtractionContext;
use crate::{constants::variable, event::Event, trace::TraceError};

/// Point events where the score rises by exactly the brick value while the
/// player is airborne.
pub(super) fn extract(ctx: &ExtractionContext<'_>) -> Result<Vec<Event>, TraceError> {
    let score = ctx.trace.signal(variable::SCORE)?;
    let airborne = ctx.trace.signal(variable::JUMP_AIRBORNE)?;
    let increment = ctx.constants.brick_score_increment;

    Ok(deltas(score)
        .filter(|&(frame, delta)| delta == increment && airborne[frame] == 1)
        .map(|(frame, _)| {
            Event::point("Brick_smashed", ctx.trace.level(), frame, ctx.sampling_rate)
        })
        .collect())
}

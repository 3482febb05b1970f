//! Powerups collected.

use marevt_signal::delta::transitions;

use super::ExtractionContext;
use crate::{constants::variable, event::Event, trace::TraceError};

/// Point events at the last frame of each powerup-absorbing player state.
pub(super) fn extract(ctx: &ExtractionContext<'_>) -> Result<Vec<Event>, TraceError> {
    let player_state = ctx.trace.signal(variable::PLAYER_STATE)?;
    Ok(transitions(player_state)
        .filter(|t| ctx.constants.is_powerup_state(t.from))
        .map(|t| {
            Event::point(
                "Powerup_collected",
                ctx.trace.level(),
                t.frame,
                ctx.sampling_rate,
            )
        })
        .collect())
}

//! Enemy kills.

use super::ExtractionContext;
use crate::{constants::variable, event::Event, trace::TraceError};

/// One point event per enemy kill, labeled `Kill/<kind>`.
///
/// An enemy slot holds a kill code for a few frames after the kill; the event
/// is placed on the last frame before the code changes. Kills in the powerup
/// slot are only reported when the repetition's `powerup_yes_no` flag is set.
/// Unknown codes are ignored.
pub(super) fn extract(ctx: &ExtractionContext<'_>) -> Result<Vec<Event>, TraceError> {
    let constants = ctx.constants;
    let slots = constants
        .kill_slot_names()
        .map(|name| ctx.trace.signal(&name))
        .collect::<Result<Vec<_>, _>>()?;
    let powerup_present = ctx.trace.flag(variable::POWERUP_YES_NO).unwrap_or(false);

    let mut events = vec![];
    for frame in 0..ctx.trace.frame_count().saturating_sub(1) {
        for (slot, values) in slots.iter().enumerate() {
            let current = values[frame];
            if current == values[frame + 1] {
                continue;
            }
            let Some(kind) = constants.kill_kind(current) else {
                continue;
            };
            // The legacy annotator kept slot-5 kills only when the flag was
            // zero, the opposite of this gate. Needs domain confirmation.
            if slot == constants.powerup_kill_slot && !powerup_present {
                continue;
            }
            events.push(Event::point(
                format!("Kill/{kind}"),
                ctx.trace.level(),
                frame,
                ctx.sampling_rate,
            ));
        }
    }
    Ok(events)
}

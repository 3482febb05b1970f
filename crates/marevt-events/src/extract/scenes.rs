//! Scene traversals.

use super::ExtractionContext;
use crate::{event::Event, trace::TraceError};

/// One interval event per scene clip of the repetition, labeled
/// `scene-<name>_code-<code>` and carrying the clip's own level.
///
/// Returns nothing when no clip source is configured. Clips ending before
/// they start are skipped.
pub(super) fn extract(ctx: &ExtractionContext<'_>) -> Result<Vec<Event>, TraceError> {
    let Some(lookup) = ctx.scenes else {
        return Ok(vec![]);
    };
    let events = lookup
        .source
        .clips_for(lookup.key)
        .into_iter()
        .filter_map(|clip| {
            if clip.end_frame < clip.start_frame {
                tracing::warn!(
                    scene = %clip.scene,
                    code = %clip.code,
                    "skipping scene clip that ends before it starts"
                );
                return None;
            }
            Some(Event::interval(
                format!("scene-{}_code-{}", clip.scene, clip.code),
                clip.level,
                clip.start_frame,
                clip.end_frame,
                ctx.sampling_rate,
            ))
        })
        .collect();
    Ok(events)
}

//! Coins collected.

use marevt_signal::delta::deltas;

use super::ExtractionContext;
use crate::{constants::variable, event::Event, trace::TraceError};

/// One point event per frame where the coin counter increases, whatever the
/// number of coins gained.
pub(super) fn extract(ctx: &ExtractionContext<'_>) -> Result<Vec<Event>, TraceError> {
    let coins = ctx.trace.signal(variable::COINS)?;
    Ok(deltas(coins)
        .filter(|&(_, delta)| delta > 0)
        .map(|(frame, _)| {
            Event::point("Coin_collected", ctx.trace.level(), frame, ctx.sampling_rate)
        })
        .collect())
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

    #[test]
    fn test_multi_coin_pickup_is_one_event() {
        let trace = VariableTrace::new("Level1-1")
            .with_signal("coins", vec![0, 1, 1, 3])
            .unwrap();
        let events = extract_at_1hz(EventCategory::Coins, &trace);
        assert_eq!(labels(&events), ["Coin_collected", "Coin_collected"]);
        assert_eq!(frames(&events), [0, 2]);
    }

    #[test]
    fn test_counter_wrap_is_ignored() {
        // The counter resets to zero after 99 coins (an extra life is awarded).
        let trace = VariableTrace::new("Level1-1")
            .with_signal("coins", vec![98, 99, 0, 0])
            .unwrap();
        let events = extract_at_1hz(EventCategory::Coins, &trace);
        assert_eq!(frames(&events), [0]);
    }
}

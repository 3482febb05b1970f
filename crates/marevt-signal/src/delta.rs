//! Adjacent-frame scans over numeric and categorical signals.

/// A change of value between two adjacent frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<T> {
    /// Index of the last frame holding `from`.
    pub frame: usize,
    /// Value at `frame`.
    pub from: T,
    /// Value at `frame + 1`.
    pub to: T,
}

/// Returns `(frame, values[frame + 1] - values[frame])` for every adjacent pair.
///
/// A signal with fewer than two frames yields nothing.
///
/// # Examples
///
/// ```
/// # use marevt_signal::delta::deltas;
/// let lives = [3, 3, 2, 2];
/// let diffs = deltas(&lives).collect::<Vec<_>>();
/// assert_eq!(diffs, [(0, 0), (1, -1), (2, 0)]);
/// ```
pub fn deltas(values: &[i64]) -> impl Iterator<Item = (usize, i64)> + '_ {
    values
        .windows(2)
        .enumerate()
        .map(|(frame, pair)| (frame, pair[1].wrapping_sub(pair[0])))
}

/// Returns every frame whose value differs from the next frame's value.
///
/// # Examples
///
/// ```
/// # use marevt_signal::delta::{transitions, Transition};
/// let state = [0, 9, 9, 12];
/// let changes = transitions(&state).collect::<Vec<_>>();
/// assert_eq!(changes[1], Transition { frame: 2, from: 9, to: 12 });
/// ```
pub fn transitions<T>(values: &[T]) -> impl Iterator<Item = Transition<T>> + '_
where
    T: PartialEq + Copy,
{
    values
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(frame, pair)| Transition {
            frame,
            from: pair[0],
            to: pair[1],
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_of_short_signals() {
        assert_eq!(deltas(&[]).count(), 0);
        assert_eq!(deltas(&[7]).count(), 0);
        assert_eq!(deltas(&[7, 4]).collect::<Vec<_>>(), [(0, -3)]);
    }

    #[test]
    fn test_deltas_report_magnitude() {
        let coins = [0, 1, 1, 3];
        let diffs = deltas(&coins).collect::<Vec<_>>();
        assert_eq!(diffs, [(0, 1), (1, 0), (2, 2)]);
    }

    #[test]
    fn test_transitions_skip_constant_runs() {
        let kills = [0, 4, 4, 0];
        let changes = transitions(&kills).collect::<Vec<_>>();
        assert_eq!(
            changes,
            [
                Transition {
                    frame: 0,
                    from: 0,
                    to: 4
                },
                Transition {
                    frame: 2,
                    from: 4,
                    to: 0
                },
            ]
        );
    }

    #[test]
    fn test_transitions_of_constant_signal() {
        assert_eq!(transitions(&[5, 5, 5, 5]).count(), 0);
    }
}

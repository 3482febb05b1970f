//! Edge detection for binary (pressed/released) signals.
//!
//! Button traces are recorded as one boolean per frame. Before scanning, the
//! first and last frames are forced to the inactive state. A button held when
//! the recording starts therefore yields a press at frame 0, and a button held
//! when it stops yields a release on the final transition.

use std::cmp::Ordering;

/// Rising and falling edges of a binary signal.
///
/// Both lists are sorted ascending. For a signal produced by [`Edges::detect`]
/// the two lists always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edges {
    /// Frames after which the signal goes from inactive to active.
    pub rising: Vec<usize>,
    /// Frames after which the signal goes from active to inactive.
    pub falling: Vec<usize>,
}

/// One completed press, from the rising edge to the matching falling edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub start: usize,
    pub stop: usize,
}

impl Press {
    /// Number of frames between the press and the release.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.stop - self.start
    }
}

/// Result of pairing rising edges with falling edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairing {
    /// Completed presses, in press order.
    pub presses: Vec<Press>,
    /// Edges left over because one list was longer than the other.
    pub unmatched: usize,
}

impl Edges {
    /// Detects the edges of a binary signal.
    ///
    /// Any non-zero value counts as active. The first and last frames are
    /// treated as inactive regardless of their recorded value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use marevt_signal::edge::Edges;
    /// // Held for the whole recording: one press spanning the active frames.
    /// let edges = Edges::detect([1, 1, 1, 1]);
    /// assert_eq!(edges.rising, [0]);
    /// assert_eq!(edges.falling, [2]);
    /// ```
    #[must_use]
    pub fn detect<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut levels = values
            .into_iter()
            .map(|v| i8::from(v != 0))
            .collect::<Vec<_>>();
        if let Some(first) = levels.first_mut() {
            *first = 0;
        }
        if let Some(last) = levels.last_mut() {
            *last = 0;
        }

        let mut rising = vec![];
        let mut falling = vec![];
        for (frame, pair) in levels.windows(2).enumerate() {
            match pair[1].cmp(&pair[0]) {
                Ordering::Greater => rising.push(frame),
                Ordering::Less => falling.push(frame),
                Ordering::Equal => {}
            }
        }
        Self { rising, falling }
    }

    /// Pairs the i-th rising edge with the i-th falling edge.
    ///
    /// When the lists differ in length, the surplus edges are dropped and
    /// counted in [`Pairing::unmatched`]. Pairs whose release precedes the
    /// press are dropped as well.
    ///
    /// # Examples
    ///
    /// ```
    /// # use marevt_signal::edge::{Edges, Press};
    /// let edges = Edges { rising: vec![2, 8], falling: vec![5] };
    /// let pairing = edges.pair();
    /// assert_eq!(pairing.presses, [Press { start: 2, stop: 5 }]);
    /// assert_eq!(pairing.unmatched, 1);
    /// ```
    #[must_use]
    pub fn pair(&self) -> Pairing {
        let mut rising = self.rising.clone();
        let mut falling = self.falling.clone();
        rising.sort_unstable();
        falling.sort_unstable();

        let mut unmatched = rising.len().abs_diff(falling.len());
        let mut presses = Vec::with_capacity(rising.len().min(falling.len()));
        for (start, stop) in rising.into_iter().zip(falling) {
            if stop < start {
                unmatched += 2;
                continue;
            }
            presses.push(Press { start, stop });
        }
        Pairing { presses, unmatched }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_interior_presses() {
        let edges = Edges::detect([0, 0, 1, 1, 1, 0, 0, 1, 0, 0]);
        assert_eq!(edges.rising, [1, 6]);
        assert_eq!(edges.falling, [4, 7]);

        let pairing = edges.pair();
        assert_eq!(
            pairing.presses,
            [Press { start: 1, stop: 4 }, Press { start: 6, stop: 7 }]
        );
        assert_eq!(pairing.unmatched, 0);
    }

    #[test]
    fn test_press_held_at_boundaries_is_closed() {
        let edges = Edges::detect([1, 1, 0, 0, 1, 1]);
        assert_eq!(edges.rising, [0, 3]);
        assert_eq!(edges.falling, [1, 4]);
    }

    #[test]
    fn test_active_except_boundaries() {
        let edges = Edges::detect([0, 1, 1, 1, 1, 0]);
        let pairing = edges.pair();
        assert_eq!(pairing.presses, [Press { start: 0, stop: 4 }]);
        assert_eq!(pairing.presses[0].frames(), 4);
    }

    #[test]
    fn test_short_signals_have_no_edges() {
        assert_eq!(Edges::detect(Vec::<i64>::new()), Edges::default());
        assert_eq!(Edges::detect([1]), Edges::default());
        assert_eq!(Edges::detect([1, 1]), Edges::default());
    }

    #[test]
    fn test_non_binary_values_are_discretized() {
        let edges = Edges::detect([0, 2, 7, 0, 0]);
        assert_eq!(edges.rising, [0]);
        assert_eq!(edges.falling, [2]);
    }

    #[test]
    fn test_more_presses_than_releases_truncates() {
        let edges = Edges {
            rising: vec![1, 5, 9],
            falling: vec![3, 7],
        };
        let pairing = edges.pair();
        assert_eq!(pairing.presses.len(), 2);
        assert_eq!(pairing.unmatched, 1);
    }

    #[test]
    fn test_unsorted_edges_are_sorted_before_pairing() {
        let edges = Edges {
            rising: vec![6, 1],
            falling: vec![7, 4],
        };
        let pairing = edges.pair();
        assert_eq!(
            pairing.presses,
            [Press { start: 1, stop: 4 }, Press { start: 6, stop: 7 }]
        );
    }

    proptest! {
        #[test]
        fn prop_rising_and_falling_counts_match(values in prop::collection::vec(0i64..=1, 0..200)) {
            let edges = Edges::detect(values);
            prop_assert_eq!(edges.rising.len(), edges.falling.len());
        }

        #[test]
        fn prop_presses_are_well_formed(values in prop::collection::vec(0i64..=1, 0..200)) {
            let len = values.len();
            let pairing = Edges::detect(values).pair();
            prop_assert_eq!(pairing.unmatched, 0);
            for press in &pairing.presses {
                prop_assert!(press.start < press.stop);
                prop_assert!(press.stop + 1 < len);
            }
            for pair in pairing.presses.windows(2) {
                prop_assert!(pair[0].stop < pair[1].start);
            }
        }
    }
}

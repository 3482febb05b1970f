//! Per-frame signal primitives for gameplay telemetry.
//!
//! This crate provides the low-level scans that turn frame-by-frame variable
//! traces into discrete transition points:
//!
//! - **Edge detection**: rising/falling edges of a binary signal, with the
//!   first and last frames forced inactive so every press has a release
//! - **Press pairing**: matching the i-th rising edge with the i-th falling edge
//! - **Adjacent deltas**: frame-to-frame differences of a counter signal
//! - **Value transitions**: frames where a categorical signal changes value
//!
//! # Frame indexing
//!
//! All scans report a change between frame `i` and frame `i + 1` at index `i`,
//! i.e. at the position in the adjacent-difference sequence.
//!
//! # Examples
//!
//! ```
//! use marevt_signal::edge::Edges;
//!
//! let edges = Edges::detect([0, 0, 1, 1, 1, 0, 0, 1, 0, 0]);
//! assert_eq!(edges.rising, [1, 6]);
//! assert_eq!(edges.falling, [4, 7]);
//! ```
//!
//! ```
//! use marevt_signal::delta;
//!
//! let coins = [0, 1, 1, 3];
//! let gains = delta::deltas(&coins)
//!     .filter(|&(_, d)| d > 0)
//!     .map(|(frame, _)| frame)
//!     .collect::<Vec<_>>();
//! assert_eq!(gains, [0, 2]);
//! ```

pub mod delta;
pub mod edge;

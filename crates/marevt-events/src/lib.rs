//! Event extraction from Super Mario Bros. gameplay captures
//!
//! This crate turns per-frame game variables recorded while subjects play into
//! BIDS-style event tables: one row per labeled occurrence (button press, enemy
//! kill, hit taken, brick smashed, coin or powerup collected, scene traversal)
//! with onset and duration in seconds and frame indices.
//!
//! # Overview
//!
//! A run is a recording session made of several repetitions (attempts at a
//! level). Annotating a run follows these steps:
//!
//! 1. **Load Captures** ([`trace::VariableTrace`]): Per-frame variables of each
//!    repetition, or [`trace::RepetitionCapture::Missing`]
//! 2. **Extract Events** ([`extract::EventCategory`]): Seven extractors scan the
//!    signals, in a fixed category order
//! 3. **Compose Repetitions** ([`compose::RepetitionComposer`]): Shift every
//!    event onto the run timeline
//! 4. **Merge Run** ([`merge::RunEventTable`]): Combine the repetition rows and
//!    events, sorted by onset
//!
//! [`run::annotate_run`] performs all of them.
//!
//! # Event Labels
//!
//! | Category | `trial_type` | Kind |
//! |----------|--------------|------|
//! | Actions | `UP`, `DOWN`, `LEFT`, `RIGHT`, `A`, `B`, `START`, `SELECT` | interval |
//! | Kills | `Kill/stomp`, `Kill/impact`, `Kill/kick` | point |
//! | Hits taken | `Hit/powerup_lost`, `Hit/life_lost` | point |
//! | Bricks | `Brick_smashed` | point |
//! | Coins | `Coin_collected` | point |
//! | Powerups | `Powerup_collected` | point |
//! | Scenes | `scene-<name>_code-<code>` | interval |
//!
//! # Examples
//!
//! ```
//! use marevt_events::{
//!     compose::RepetitionComposer,
//!     repetition::RepetitionRecord,
//!     run::annotate_run,
//!     trace::RepetitionCapture,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let records = vec![RepetitionRecord::new(0, "gym-retro_game", 0.0)];
//! let captures = vec![RepetitionCapture::Missing];
//!
//! let composer = RepetitionComposer::new(marevt_events::constants::DEFAULT_SAMPLING_RATE);
//! let table = annotate_run(&composer, "run-01", records, &captures)?;
//! assert_eq!(table.len(), 1);
//!
//! let mut tsv = Vec::<u8>::new();
//! table.write_tsv(&mut tsv)?;
//! # Ok(())
//! # }
//! ```

pub mod compose;
pub mod constants;
pub mod event;
pub mod extract;
pub mod merge;
pub mod repetition;
pub mod run;
pub mod scene;
pub mod trace;

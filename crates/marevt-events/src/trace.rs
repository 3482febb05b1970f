//! Per-repetition variable traces decoded from gameplay captures.
//!
//! A capture sidecar is a JSON object mapping variable names to either one
//! value per frame (button states, score, lives, enemy slots, ...) or a single
//! repetition-level value (`level`, `filename`, flags).
//!
//! ```json
//! {
//!   "level": "Level1-1",
//!   "filename": "sub-01_ses-001_task-mario_run-01_level-w1l1_rep-000.bk2",
//!   "score": [0, 0, 5, 5],
//!   "A": [false, true, true, false],
//!   "powerup_yes_no": 0
//! }
//! ```
//!
//! All per-frame variables of one repetition share the same length, the
//! repetition's frame count.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

const LEVEL_KEY: &str = "level";
const FILENAME_KEY: &str = "filename";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TraceError {
    #[display("variable `{name}` is missing from the capture")]
    MissingVariable { name: String },
    #[display("variable `{name}` has {actual} frames, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[display("variable `{name}` has a non-integer value at frame {frame}")]
    InvalidValue { name: String, frame: usize },
    #[display("variable `{name}` must be a string")]
    InvalidText { name: String },
}

impl TraceError {
    fn missing(name: &str) -> Self {
        Self::MissingVariable {
            name: name.to_owned(),
        }
    }
}

/// The capture of one repetition, or the lack of one.
#[derive(Debug, Clone, PartialEq)]
pub enum RepetitionCapture {
    Recorded(VariableTrace),
    /// The repetition has no usable capture (file absent or marked missing).
    Missing,
}

impl RepetitionCapture {
    #[must_use]
    pub fn as_recorded(&self) -> Option<&VariableTrace> {
        match self {
            Self::Recorded(trace) => Some(trace),
            Self::Missing => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Variables recorded during one repetition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTrace {
    level: String,
    filename: Option<String>,
    frame_count: usize,
    signals: BTreeMap<String, Vec<i64>>,
    scalars: BTreeMap<String, i64>,
}

impl VariableTrace {
    /// Creates an empty trace for the given level.
    #[must_use]
    pub fn new<S>(level: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filename<S>(mut self, filename: S) -> Self
    where
        S: Into<String>,
    {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_scalar<S>(mut self, name: S, value: i64) -> Self
    where
        S: Into<String>,
    {
        self.scalars.insert(name.into(), value);
        self
    }

    /// Adds a per-frame signal.
    ///
    /// The first signal fixes the frame count unless it is already known;
    /// every other signal must match it.
    pub fn with_signal<S, V>(mut self, name: S, values: V) -> Result<Self, TraceError>
    where
        S: Into<String>,
        V: Into<Vec<i64>>,
    {
        let name = name.into();
        let values = values.into();
        if self.signals.is_empty() && self.frame_count == 0 {
            self.frame_count = values.len();
        } else if values.len() != self.frame_count {
            return Err(TraceError::LengthMismatch {
                name,
                expected: self.frame_count,
                actual: values.len(),
            });
        }
        self.signals.insert(name, values);
        Ok(self)
    }

    /// Builds a trace from a decoded capture sidecar.
    ///
    /// Arrays of numbers or booleans become per-frame signals (booleans as
    /// 0/1). A one-element array in a multi-frame capture is read as a scalar.
    /// `level` and `filename` must be strings. Variables of any other shape are
    /// ignored.
    pub fn from_json_map(map: &Map<String, Value>) -> Result<Self, TraceError> {
        let mut level = None;
        let mut filename = None;
        let mut arrays = vec![];
        let mut scalars = BTreeMap::new();

        for (name, value) in map {
            match name.as_str() {
                LEVEL_KEY => level = Some(text_value(name, value)?),
                FILENAME_KEY => filename = Some(text_value(name, value)?),
                _ => match value {
                    Value::Array(items) => {
                        if let Some(values) = integer_array(name, items)? {
                            arrays.push((name.clone(), values));
                        } else {
                            tracing::trace!(variable = %name, "ignoring non-numeric variable");
                        }
                    }
                    Value::Bool(_) | Value::Number(_) => {
                        if let Some(value) = integer_value(value) {
                            scalars.insert(name.clone(), value);
                        }
                    }
                    _ => tracing::trace!(variable = %name, "ignoring variable"),
                },
            }
        }

        let mut trace = Self {
            level: level.ok_or_else(|| TraceError::missing(LEVEL_KEY))?,
            filename,
            scalars,
            ..Self::default()
        };

        let frame_count = arrays.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        trace.frame_count = frame_count;
        for (name, values) in arrays {
            if values.len() == 1 && frame_count > 1 {
                trace.scalars.insert(name, values[0]);
            } else {
                trace = trace.with_signal(name, values)?;
            }
        }
        Ok(trace)
    }

    /// Level identifier recorded in the capture.
    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Capture file name, used to resolve subject and session.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Per-frame values of a signal.
    pub fn signal(&self, name: &str) -> Result<&[i64], TraceError> {
        self.signals
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| TraceError::missing(name))
    }

    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<i64> {
        self.scalars.get(name).copied()
    }

    /// Reads a repetition-level flag.
    ///
    /// A scalar is true when non-zero. A per-frame signal is true when any
    /// frame is non-zero. Returns `None` when the variable is absent.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.scalar(name).map(|v| v != 0).or_else(|| {
            self.signals
                .get(name)
                .map(|values| values.iter().any(|v| *v != 0))
        })
    }

    pub fn signal_names(&self) -> impl Iterator<Item = &str> {
        self.signals.keys().map(String::as_str)
    }
}

fn text_value(name: &str, value: &Value) -> Result<String, TraceError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Array(items) if items.len() == 1 => text_value(name, &items[0]),
        _ => Err(TraceError::InvalidText {
            name: name.to_owned(),
        }),
    }
}

#[expect(clippy::cast_possible_truncation)]
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}

/// Converts a JSON array into integers.
///
/// Returns `Ok(None)` when the array holds no numbers at all (e.g. strings or
/// nested arrays), and an error when numbers are mixed with other values or
/// are not integral.
fn integer_array(name: &str, items: &[Value]) -> Result<Option<Vec<i64>>, TraceError> {
    if !items
        .iter()
        .any(|v| matches!(v, Value::Bool(_) | Value::Number(_)))
    {
        return Ok(None);
    }
    items
        .iter()
        .enumerate()
        .map(|(frame, value)| {
            integer_value(value).ok_or_else(|| TraceError::InvalidValue {
                name: name.to_owned(),
                frame,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

//! Sentinel-aware numeric result for chart values

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A projected quantity that may never be reached
///
/// Ratios whose denominator is zero or negative (no profit, no burn, no
/// margin) become `Never` instead of NaN or infinity. Serializes as a
/// number or `null`, which charting front ends render as a gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Value(f64),
    Never,
}

impl Outcome {
    /// `numerator / denominator`, or `Never` when the denominator is not positive
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator <= 0.0 || !denominator.is_finite() {
            return Outcome::Never;
        }
        Self::finite(numerator / denominator)
    }

    /// Wrap a value, mapping NaN and infinities to `Never`
    pub fn finite(value: f64) -> Self {
        if value.is_finite() {
            Outcome::Value(value)
        } else {
            Outcome::Never
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Outcome::Value(v) => Some(*v),
            Outcome::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Outcome::Never)
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Outcome::Value(v) => Self::finite(f(v)),
            Outcome::Never => Outcome::Never,
        }
    }
}

impl From<Option<f64>> for Outcome {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Outcome::Never, Outcome::finite)
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Value(v) => serializer.serialize_f64(*v),
            Outcome::Never => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Outcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<f64>::deserialize(deserializer).map(Outcome::from)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::Value(v) => format!("{:.1}", v),
            Outcome::Never => "never".to_string(),
        };
        f.pad(&text)
    }
}

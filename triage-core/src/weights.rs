//! WeightsResolver: turn a partial weight map and a strategy name into a
//! complete four-factor weight vector that sums to 1.0.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::task::RawValue;

/// Partial, loosely-typed weight map as supplied by a caller.
pub type WeightInput = BTreeMap<String, RawValue>;

/// Recognized weight keys; anything else in a `WeightInput` is ignored.
pub const WEIGHT_KEYS: [&str; 4] = ["urgency", "importance", "effort", "dependency"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency: f64,
}

impl Weights {
    pub const DEFAULT: Weights = Weights::new(0.40, 0.30, 0.20, 0.10);
    pub const FASTEST: Weights = Weights::new(0.10, 0.10, 0.70, 0.10);
    pub const IMPACT: Weights = Weights::new(0.10, 0.70, 0.10, 0.10);
    pub const DEADLINE: Weights = Weights::new(0.80, 0.10, 0.05, 0.05);

    pub const fn new(urgency: f64, importance: f64, effort: f64, dependency: f64) -> Self {
        Self {
            urgency,
            importance,
            effort,
            dependency,
        }
    }

    pub fn sum(&self) -> f64 {
        self.urgency + self.importance + self.effort + self.dependency
    }

    /// Keep the four known keys, treat anything unusable as 0, and rescale
    /// to sum 1.0. Falls back to `DEFAULT` when nothing positive remains.
    pub fn sanitize(partial: Option<&WeightInput>) -> Self {
        let Some(partial) = partial.filter(|p| !p.is_empty()) else {
            return Self::DEFAULT;
        };

        let pick = |key: &str| partial.get(key).map_or(0.0, weight_value);
        let w = Self::new(
            pick("urgency"),
            pick("importance"),
            pick("effort"),
            pick("dependency"),
        );

        // Scale by the largest entry first so huge finite weights cannot
        // overflow the sum.
        let largest = w.urgency.max(w.importance).max(w.effort).max(w.dependency);
        if largest <= 0.0 {
            debug!(?partial, "no usable weights, using defaults");
            return Self::DEFAULT;
        }
        let w = w.divided_by(largest);
        w.divided_by(w.sum())
    }

    fn divided_by(&self, divisor: f64) -> Self {
        Self::new(
            self.urgency / divisor,
            self.importance / divisor,
            self.effort / divisor,
            self.dependency / divisor,
        )
    }

    /// Resolve the weights for a scoring run. A preset strategy wins over
    /// any custom weights; `Smart` uses the sanitized custom/default vector.
    pub fn resolve(partial: Option<&WeightInput>, strategy: Strategy) -> Self {
        let sanitized = Self::sanitize(partial);
        match strategy.preset() {
            Some(preset) => {
                if partial.is_some_and(|p| !p.is_empty()) {
                    debug!(%strategy, "strategy preset overrides custom weights");
                }
                preset
            }
            None => sanitized,
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Non-negative finite value of a weight entry; anything else counts as 0.
fn weight_value(value: &RawValue) -> f64 {
    let v = match value {
        RawValue::Int(n) => *n as f64,
        RawValue::Float(f) => *f,
        RawValue::Bool(b) => f64::from(u8::from(*b)),
        RawValue::Text(s) => s.trim().parse().unwrap_or(0.0),
        RawValue::Date(_) | RawValue::Other(_) => 0.0,
    };
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Read an optional weight map from any JSON value. A value that is not an
/// object is treated as no map at all.
pub(crate) fn deserialize_weight_input<'de, D>(deserializer: D) -> Result<Option<WeightInput>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(Some(
            map.into_iter()
                .map(|(key, value)| (key, RawValue::from(value)))
                .collect(),
        )),
        Value::Null => Ok(None),
        other => {
            debug!(%other, "weights is not a map, ignoring");
            Ok(None)
        }
    }
}

/// Named weight preset.
///
/// Parsing never fails: names are matched case-insensitively, and anything
/// unrecognized (or not a string at all) is `Smart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Smart,
    Fastest,
    Impact,
    Deadline,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Smart => "smart",
            Strategy::Fastest => "fastest",
            Strategy::Impact => "impact",
            Strategy::Deadline => "deadline",
        }
    }

    /// Fixed weights for preset strategies; `None` for `Smart`.
    pub fn preset(&self) -> Option<Weights> {
        match self {
            Strategy::Smart => None,
            Strategy::Fastest => Some(Weights::FASTEST),
            Strategy::Impact => Some(Weights::IMPACT),
            Strategy::Deadline => Some(Weights::DEADLINE),
        }
    }
}

impl From<&str> for Strategy {
    fn from(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "fastest" => Strategy::Fastest,
            "impact" => Strategy::Impact,
            "deadline" => Strategy::Deadline,
            "smart" => Strategy::Smart,
            other => {
                debug!(strategy = other, "unknown strategy, using smart");
                Strategy::Smart
            }
        }
    }
}

impl From<String> for Strategy {
    fn from(name: String) -> Self {
        Strategy::from(name.as_str())
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(name) => Ok(Strategy::from(name)),
            other => {
                debug!(%other, "strategy is not a name, using smart");
                Ok(Strategy::Smart)
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core data structures for benchmark results
///
/// This module defines the per-file result record as written by the benchmark
/// runner, plus the derived classification vocabulary used by the aggregator,
/// the differ and the report layer.
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Robustness flag set when the output is a valid closed solid
pub const VALID_SOLID_OUTPUT: &str = "VALID_SOLID_OUTPUT";
/// Robustness flag set when the input mesh itself was rejected
pub const INPUT_IS_INVALID: &str = "INPUT_IS_INVALID";
/// Robustness flag set when the output deviates too far from the input
pub const OUTPUT_DISTANCE_IS_TOO_LARGE: &str = "OUTPUT_DISTANCE_IS_TOO_LARGE";
/// Robustness flag set when the run was killed by the time limit
pub const TIMEOUT: &str = "TIMEOUT";

/// A single metric value. The runner writes numbers, but also strings such as
/// "N/A" or numbers read back from log files as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl MetricValue {
    /// Numeric view of the value, parsing text the way a float parser would
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            MetricValue::Other(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => write!(f, "{}", s),
            MetricValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Raw robustness block: flag name -> 0/1 (kept as JSON to tolerate odd values)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Robustness(pub BTreeMap<String, serde_json::Value>);

impl Robustness {
    /// True when `flag` is present with the numeric value 1
    pub fn flag(&self, flag: &str) -> bool {
        self.0.get(flag).and_then(serde_json::Value::as_f64) == Some(1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }
}

/// One file's benchmark outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Directory prefix below the dataset, e.g. "sub/dir/" (may be empty)
    #[serde(default, deserialize_with = "lenient_path", skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(
        rename = "Performance",
        default,
        deserialize_with = "lenient_metrics",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub performance: BTreeMap<String, MetricValue>,

    #[serde(
        rename = "Quality",
        default,
        deserialize_with = "lenient_metrics",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub quality: BTreeMap<String, MetricValue>,

    /// None when the block is missing or is not an object
    #[serde(
        rename = "Robustness",
        default,
        deserialize_with = "lenient_robustness",
        skip_serializing_if = "Option::is_none"
    )]
    pub robustness: Option<Robustness>,
}

impl ResultRecord {
    /// Name shown to the user: path prefix followed by the file name
    pub fn display_name(&self, file_name: &str) -> String {
        match self.path.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{}{}", prefix, file_name),
            _ => file_name.to_string(),
        }
    }
}

fn lenient_robustness<'de, D>(deserializer: D) -> Result<Option<Robustness>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Object(map) => Ok(Some(Robustness(map.into_iter().collect()))),
        serde_json::Value::Null => Ok(None),
        other => {
            log::debug!("ignoring malformed Robustness block: {}", other);
            Ok(None)
        }
    }
}

fn lenient_path<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Null => Ok(None),
        other => {
            log::debug!("ignoring malformed path: {}", other);
            Ok(None)
        }
    }
}

/// A metric block that is not an object (e.g. `null`) reads as empty
fn lenient_metrics<'de, D>(deserializer: D) -> Result<BTreeMap<String, MetricValue>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(label, value)| {
                let metric = serde_json::from_value(value.clone()).unwrap_or(MetricValue::Other(value));
                (label, metric)
            })
            .collect()),
        serde_json::Value::Null => Ok(BTreeMap::new()),
        other => {
            log::debug!("ignoring malformed metric block: {}", other);
            Ok(BTreeMap::new())
        }
    }
}

/// Derived outcome class of a result record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Valid,
    Error,
    Timeout,
}

impl Classification {
    pub const ALL: [Classification; 3] = [Classification::Valid, Classification::Error, Classification::Timeout];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Valid => "valid",
            Classification::Error => "error",
            Classification::Timeout => "timeout",
        }
    }

    /// Which direction of change counts as an improvement
    pub fn polarity(&self) -> Polarity {
        match self {
            Classification::Valid => Polarity::HigherIsBetter,
            Classification::Error | Classification::Timeout => Polarity::LowerIsBetter,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification filter used by drill-down views ("all" or one class)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Valid,
    Error,
    Timeout,
}

impl TypeFilter {
    pub fn classification(&self) -> Option<Classification> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Valid => Some(Classification::Valid),
            TypeFilter::Error => Some(Classification::Error),
            TypeFilter::Timeout => Some(Classification::Timeout),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self.classification() {
            Some(c) => c.as_str(),
            None => "all",
        }
    }

    /// Title-cased label, e.g. "Timeout"
    pub fn title(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<Classification> for TypeFilter {
    fn from(c: Classification) -> Self {
        match c {
            Classification::Valid => TypeFilter::Valid,
            Classification::Error => TypeFilter::Error,
            Classification::Timeout => TypeFilter::Timeout,
        }
    }
}

/// Direction in which a count or metric improves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
    Neutral,
}

/// Whether a signed change is an improvement under some polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Better,
    Worse,
    Same,
}

impl Trend {
    pub fn from_delta(delta: f64, polarity: Polarity) -> Self {
        if delta == 0.0 || delta.is_nan() {
            return Trend::Same;
        }
        match polarity {
            Polarity::HigherIsBetter if delta > 0.0 => Trend::Better,
            Polarity::HigherIsBetter => Trend::Worse,
            Polarity::LowerIsBetter if delta < 0.0 => Trend::Better,
            Polarity::LowerIsBetter => Trend::Worse,
            Polarity::Neutral => Trend::Same,
        }
    }
}

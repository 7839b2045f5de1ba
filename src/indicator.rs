//! Indicator aggregation: ranking, presence distribution and summary statistics.
//!
//! Every structure here is a pure recomputation from `(rows, accessor)`; nothing
//! is cached between calls.

use crate::types::{Row, number_of, text_of};
use serde::{Serialize, Serializer, ser};
use serde_json::{Map, Value, json};
use std::cmp::Ordering;

/// Row field holding the village name
pub const NAME_FIELD: &str = "desa";

/// Row field holding the district name
pub const AREA_FIELD: &str = "kecamatan";

pub const PRESENT_LABEL: &str = "Ada";
pub const ABSENT_LABEL: &str = "Tidak Ada";

/// Caller-supplied projection of a row onto the numeric value of interest.
///
/// `None` means the value could not be read; it counts as 0.
pub type Accessor<'a, R> = &'a dyn Fn(&R) -> Option<f64>;

/// A source row with its value, 1-based rank and display name attached.
///
/// Serialises as the row's own fields plus `value`, `rank` and `displayName`.
/// The attached fields replace row fields of the same name. A row that is not
/// a JSON object is nested under `row`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecord<R> {
    pub row: R,
    pub value: f64,
    pub rank: usize,
    pub display_name: String,
}

impl<R: Serialize> Serialize for RankedRecord<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = match serde_json::to_value(&self.row).map_err(ser::Error::custom)? {
            Value::Object(map) => map,
            other => Map::from_iter([("row".to_string(), other)]),
        };
        fields.insert("value".to_string(), json!(self.value));
        fields.insert("rank".to_string(), json!(self.rank));
        fields.insert("displayName".to_string(), json!(self.display_name));
        fields.serialize(serializer)
    }
}

/// One non-empty bucket, in chart order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBucket {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Split of the dataset into rows with `value > 0` (ada) and the rest (tidak ada)
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Distribution {
    pub ada: usize,
    #[serde(rename = "tidakAda")]
    pub tidak_ada: usize,
    #[serde(rename = "adaPercentage")]
    pub ada_percentage: f64,
    #[serde(rename = "tidakAdaPercentage")]
    pub tidak_ada_percentage: f64,
    /// Non-empty buckets only, absent bucket first
    pub chart: Vec<DistributionBucket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryStats {
    pub max: f64,
    pub min: f64,
    pub sum: f64,
    pub count: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorResult<R> {
    #[serde(rename = "rankingList")]
    pub ranking: Vec<RankedRecord<R>>,
    pub distribution: Distribution,
    pub stats: SummaryStats,
    #[serde(rename = "isEmpty")]
    pub is_empty: bool,
}

impl<R> IndicatorResult<R> {
    /// The canonical result for no rows or no accessor
    pub fn empty() -> Self {
        Self { ranking: Vec::new(), distribution: Distribution::default(), stats: SummaryStats::default(), is_empty: true }
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Percentage label with one decimal, or "0" for an empty bucket
pub fn percentage_label(count: usize, percentage: f64) -> String {
    if count == 0 { "0".to_string() } else { format!("{:.1}", percentage) }
}

/// Accessor that reads a numeric field, coercing text such as `"12"`
pub fn field_accessor<R: Row>(field: &str) -> impl Fn(&R) -> Option<f64> + '_ {
    move |row: &R| row.field(field).map(|v| number_of(Some(v)))
}

/// `"{rank}. {desa}, {kecamatan}"`, with `-` for a missing name
pub fn display_name<R: Row>(row: &R, rank: usize) -> String {
    let placeholder = |field: &str| {
        let text = text_of(row.field(field));
        if text.is_empty() { "-".to_string() } else { text }
    };
    format!("{}. {}, {}", rank, placeholder(NAME_FIELD), placeholder(AREA_FIELD))
}

fn percentage_of(count: usize, total: usize) -> f64 {
    if count == 0 || total == 0 { 0.0 } else { round_to(count as f64 / total as f64 * 100.0, 1) }
}

fn build_distribution(values: &[f64]) -> Distribution {
    let total = values.len();
    let ada = values.iter().filter(|v| **v > 0.0).count();
    let tidak_ada = total - ada;

    let ada_percentage = percentage_of(ada, total);
    let tidak_ada_percentage = percentage_of(tidak_ada, total);

    let chart = [(ABSENT_LABEL, tidak_ada, tidak_ada_percentage), (PRESENT_LABEL, ada, ada_percentage)]
        .into_iter()
        .filter(|(_, count, _)| *count > 0)
        .map(|(label, count, percentage)| DistributionBucket { label: label.to_string(), count, percentage })
        .collect();

    Distribution { ada, tidak_ada, ada_percentage, tidak_ada_percentage, chart }
}

fn build_stats(values: &[f64]) -> SummaryStats {
    if values.is_empty() {
        return SummaryStats::default();
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let sum: f64 = values.iter().sum();
    let count = values.len();
    SummaryStats { max, min, sum, count, mean: round_to(sum / count as f64, 2) }
}

/// Rank, distribute and summarise `rows` by the value `accessor` projects.
///
/// Rows are ranked by value, highest first; equal values keep input order.
/// Unreadable or NaN values count as 0.
pub fn compute_indicator<R: Row + Clone>(rows: &[R], accessor: Option<Accessor<'_, R>>) -> IndicatorResult<R> {
    let accessor = match accessor {
        Some(accessor) if !rows.is_empty() => accessor,
        _ => return IndicatorResult::empty(),
    };

    let values: Vec<f64> = rows.iter().map(|row| accessor(row).filter(|v| !v.is_nan()).unwrap_or(0.0)).collect();

    let mut order: Vec<usize> = (0..rows.len()).collect();
    // Stable: equal values keep their input order
    order.sort_by(|&a, &b| values[b].partial_cmp(&values[a]).unwrap_or(Ordering::Equal));

    let ranking = order
        .into_iter()
        .enumerate()
        .map(|(pos, idx)| {
            let rank = pos + 1;
            RankedRecord { row: rows[idx].clone(), value: values[idx], rank, display_name: display_name(&rows[idx], rank) }
        })
        .collect();

    IndicatorResult { ranking, distribution: build_distribution(&values), stats: build_stats(&values), is_empty: false }
}

#[cfg(test)]
#[path = "indicator_test.rs"]
mod indicator_test;

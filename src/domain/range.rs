//! Quantized range fields.
//!
//! A range field does not accept every integer between its bounds. Its legal
//! stops are generated by a [`Quantization`] rule, and each stop renders as a
//! human readable duration label.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// `(upper bound, step)` pairs; a value below the bound advances by the step.
const STEP_TIERS: [(i64, i64); 4] = [(12, 1), (24, 3), (36, 6), (48, 12)];
const COARSE_STEP: i64 = 24;
const HOURS_PER_DAY: i64 = 24;

static LEADING_INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+)").expect("leading integer pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantization {
    /// Evenly spaced by `step`.
    Linear,
    /// Fine steps near zero, coarser steps as the value grows.
    Tiered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub quantization: Quantization,
}

impl RangeSpec {
    pub fn tiered(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            step: 1,
            quantization: Quantization::Tiered,
        }
    }

    pub fn linear(min: i64, max: i64, step: i64) -> Self {
        Self {
            min,
            max,
            step,
            quantization: Quantization::Linear,
        }
    }

    /// Legal stops for this field, recomputed from the bounds on every call.
    pub fn allowed_values(&self) -> Vec<i64> {
        match self.quantization {
            Quantization::Tiered => allowed_values(self.min, self.max),
            Quantization::Linear => linear_values(self.min, self.max, self.step),
        }
    }

    /// Index of the legal stop closest to `value`; ties go to the lower stop.
    pub fn nearest_position(&self, value: i64) -> Option<usize> {
        self.allowed_values()
            .iter()
            .enumerate()
            .min_by_key(|(_, stop)| value.abs_diff(**stop))
            .map(|(idx, _)| idx)
    }

    pub fn label_for(&self, value: &Value) -> Option<String> {
        coerce_integer(value).map(format_label)
    }
}

/// Step taken from `value` to the next legal stop.
pub fn step_for(value: i64) -> i64 {
    STEP_TIERS
        .iter()
        .find(|(bound, _)| value < *bound)
        .map(|(_, step)| *step)
        .unwrap_or(COARSE_STEP)
}

/// Generates the strictly increasing stops from `min` up to at most `max`.
///
/// The first element is always `min` (when `min <= max`); generation stops as
/// soon as the next candidate would exceed `max`, so the last element may be
/// short of `max`.
pub fn allowed_values(min: i64, max: i64) -> Vec<i64> {
    let mut values = Vec::new();
    let mut current = min;
    while current <= max {
        values.push(current);
        match current.checked_add(step_for(current)) {
            Some(next) => current = next,
            None => break,
        }
    }
    values
}

fn linear_values(min: i64, max: i64, step: i64) -> Vec<i64> {
    if min > max {
        return Vec::new();
    }
    let step = usize::try_from(step.max(1)).unwrap_or(1);
    (min..=max).step_by(step).collect()
}

/// Renders an hour count: `0` is "Disabled", whole days above 23 hours are
/// shown in days, everything else in hours.
pub fn format_label(hours: i64) -> String {
    if hours == 0 {
        return "Disabled".to_string();
    }
    if hours > 23 && hours % HOURS_PER_DAY == 0 {
        return pluralize(hours / HOURS_PER_DAY, "day");
    }
    pluralize(hours, "hour")
}

fn pluralize(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Truncating integer coercion. Numbers drop their fraction; strings use
/// their leading integer (`"36h"` is 36). Anything else has no integer form.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float.trunc() as i64)
        }),
        Value::String(text) => LEADING_INTEGER
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse::<i64>().ok()),
        _ => None,
    }
}

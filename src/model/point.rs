// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Datapoint literals and their normalization to `f64`.
//!
//! A point keeps the literal form it was entered with (JSON number or timestamp string). All
//! computation happens on the normalized value: numbers as-is, timestamps as Unix seconds (UTC).

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

/// Fixed timestamp format, always UTC.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Values above this are assumed to be Unix seconds rather than plain numbers.
pub const EPOCH_HEURISTIC_THRESHOLD: f64 = 1_700_000_000.0;

const NOW_LITERAL: &str = "now";

/// One coordinate of a datapoint, in its persisted literal form.
#[derive(Debug, Clone, PartialEq)]
pub enum PointValue {
    Number(serde_json::Number),
    Timestamp(NaiveDateTime),
    /// A string that is not a timestamp. Kept verbatim; numeric text still normalizes.
    Text(String),
}

impl PointValue {
    /// Returns the normalized value, or `None` when the literal is not a finite number or a
    /// timestamp.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => number.as_f64().filter(|v| v.is_finite()),
            Self::Timestamp(ts) => Some(ts.and_utc().timestamp() as f64),
            Self::Text(text) => parse_number(text),
        }
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, Self::Timestamp(_))
    }
}

impl fmt::Display for PointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.format(TIME_FORMAT)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for PointValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(number) => number.serialize(serializer),
            Self::Timestamp(ts) => serializer.collect_str(&ts.format(TIME_FORMAT)),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for PointValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PointValueJson {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match PointValueJson::deserialize(deserializer)? {
            PointValueJson::Number(number) => Self::Number(number),
            PointValueJson::Text(text) => match parse_timestamp(&text) {
                Some(ts) => Self::Timestamp(ts),
                None => Self::Text(text),
            },
        })
    }
}

/// An `(x, y)` pair, persisted as a 2-element JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(PointValue, PointValue)", into = "(PointValue, PointValue)")]
pub struct DataPoint {
    pub x: PointValue,
    pub y: PointValue,
}

impl DataPoint {
    pub fn new(x: PointValue, y: PointValue) -> Self {
        Self { x, y }
    }

    /// Both coordinates normalized, or `None` if either side does not normalize.
    pub fn to_f64_pair(&self) -> Option<(f64, f64)> {
        Some((self.x.to_f64()?, self.y.to_f64()?))
    }

    pub fn swapped(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

impl From<(PointValue, PointValue)> for DataPoint {
    fn from((x, y): (PointValue, PointValue)) -> Self {
        Self { x, y }
    }
}

impl From<DataPoint> for (PointValue, PointValue) {
    fn from(point: DataPoint) -> Self {
        (point.x, point.y)
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

/// Parses an operator-supplied literal into the form it will be persisted in.
///
/// `now` (any case) resolves to `now` truncated to whole seconds, stored as a timestamp.
pub fn parse_literal(raw: &str, now: DateTime<Utc>) -> CoreResult<PointValue> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(NOW_LITERAL) {
        let formatted = now.format(TIME_FORMAT).to_string();
        return parse_timestamp(&formatted)
            .map(PointValue::Timestamp)
            .ok_or_else(|| CoreError::unparseable(raw));
    }

    if let Some(value) = parse_number(trimmed) {
        return serde_json::Number::from_f64(value)
            .map(PointValue::Number)
            .ok_or_else(|| CoreError::unparseable(raw));
    }

    parse_timestamp(trimmed)
        .map(PointValue::Timestamp)
        .ok_or_else(|| CoreError::unparseable(raw))
}

/// Normalizes a raw literal to `f64` against the current clock.
pub fn normalize_value(raw: &str) -> CoreResult<f64> {
    normalize_value_at(raw, Utc::now())
}

pub fn normalize_value_at(raw: &str, now: DateTime<Utc>) -> CoreResult<f64> {
    parse_literal(raw, now)?
        .to_f64()
        .ok_or_else(|| CoreError::unparseable(raw))
}

pub fn is_timestamp_literal(raw: &str) -> bool {
    parse_timestamp(raw.trim()).is_some()
}

pub(crate) fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIME_FORMAT).ok()
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Formats Unix seconds in the fixed timestamp format.
pub fn format_epoch(seconds: f64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(seconds as i64, 0).map(|dt| dt.format(TIME_FORMAT).to_string())
}

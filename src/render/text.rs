// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::DateTime;

use crate::model::EPOCH_HEURISTIC_THRESHOLD;

const SECONDS_PER_DAY: f64 = 60.0 * 60.0 * 24.0;

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Centers `text` in `width` columns, extra padding going to the right.
pub(crate) fn center(text: &str, width: usize) -> String {
    let len = text_len(text);
    if len >= width {
        return text.to_owned();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

pub(crate) fn looks_like_epoch(value: f64) -> bool {
    value > EPOCH_HEURISTIC_THRESHOLD
}

/// Epoch-like values become days so that slopes read as "per day".
pub(crate) fn epoch_to_days(value: f64) -> f64 {
    if looks_like_epoch(value) {
        value / SECONDS_PER_DAY
    } else {
        value
    }
}

/// Short axis label: `MM-DD HH:MM` (UTC) for epoch-like values, three decimals otherwise.
pub(crate) fn axis_label(value: f64) -> String {
    if looks_like_epoch(value) {
        if let Some(ts) = DateTime::from_timestamp(value as i64, 0) {
            return ts.format("%m-%d %H:%M").to_string();
        }
    }
    format!("{value:.3}")
}

pub(crate) fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.3}%", 100.0 * value)
    } else {
        "n/a".to_owned()
    }
}

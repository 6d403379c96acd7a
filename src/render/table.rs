// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tabular view of one chain with consecutive and total slopes.
//!
//! Slopes are `dy / dx` as a percentage. Epoch-like coordinates are converted to days first, so a
//! time-indexed chain reads as "change per day" and gets a naive yearly extrapolation.

use crate::model::{DataPoint, Selection};

use super::text::{epoch_to_days, looks_like_epoch, percent};

const DAYS_PER_YEAR: f64 = 365.0;

pub fn render_table(selection: &Selection, points: &[DataPoint]) -> String {
    let mut lines = vec![format!("Data for {selection}")];

    let mut first: Option<(f64, f64)> = None;
    let mut last: Option<(f64, f64)> = None;
    let mut valid = 0usize;
    let mut calendar_x = true;
    for (i, point) in points.iter().enumerate() {
        let mut deltas = String::new();
        if let Some((x, y)) = point.to_f64_pair() {
            calendar_x &= looks_like_epoch(x);
            let current = (epoch_to_days(x), epoch_to_days(y));
            if let Some(previous) = last {
                deltas = format!("  |  delta: {:>20}", percent(slope(previous, current)));
            }
            first.get_or_insert(current);
            last = Some(current);
            valid += 1;
        }

        lines.push(format!(
            "{i:>3}. x: {:>20}     y: {:>20}{deltas}",
            point.x.to_string(),
            point.y.to_string()
        ));
    }

    if let (Some(first), Some(last), true) = (first, last, valid > 1) {
        let total = slope(first, last);
        let mut line = format!("{:>54} total delta: {:>20}", "", percent(total));
        if calendar_x && total.is_finite() {
            line.push_str(&format!(
                "  |  Year est:  {:.3}%",
                total * DAYS_PER_YEAR * 100.0
            ));
        }
        lines.push(line);
    }

    lines.join("\n")
}

fn slope((x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> f64 {
    (y1 - y0) / (x1 - x0)
}

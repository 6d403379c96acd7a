// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Catalog and session listings.

use crate::model::{format_epoch, Catalog, Selection};
use crate::session::{ActionRecord, PendingAction};

/// Lists every chain with its flat index, marking `selected` with `->`.
///
/// With `with_info`, each chain also shows its point count and last point.
pub fn render_listing(catalog: &Catalog, selected: Option<&Selection>, with_info: bool) -> String {
    let mut lines = Vec::new();
    let mut index = 0usize;
    for (token, graphs) in catalog.tokens() {
        lines.push(token.to_string());
        for (graph, chains) in graphs {
            lines.push(format!("  - {graph}"));
            for (chain, points) in chains {
                let is_selected = selected.is_some_and(|s| {
                    s.token == *token && s.graph == *graph && s.chain == *chain
                });
                let mark = if is_selected { "->" } else { " -" };
                let mut info = String::new();
                if with_info {
                    info = format!("   |   Points:{:>4}", points.len());
                    if let Some(last) = points.last() {
                        info.push_str(&format!(
                            "   |   Last:  x: {:>20}  y: {:>20}",
                            last.x.to_string(),
                            last.y.to_string()
                        ));
                    }
                }
                lines.push(format!(
                    "     {mark} {:<4} {:<20}{info}",
                    format!("[{index}]"),
                    chain.as_str()
                ));
                index += 1;
            }
        }
    }
    lines.join("\n")
}

pub fn render_pending_warning(pending: &PendingAction) -> String {
    let started = format_epoch(pending.timestamp).unwrap_or_else(|| "an unknown time".to_owned());
    format!(
        "Warning: the previous run did not finish its '{}' step (`{}`, started {started} UTC).",
        pending.action, pending.cmd
    )
}

/// Newest entry first, one line per entry.
pub fn render_history(history: &[ActionRecord], pending: Option<&PendingAction>) -> String {
    let mut lines = vec!["Action history (newest first):".to_owned()];
    for record in history {
        let when = format_epoch(record.timestamp).unwrap_or_else(|| "?".to_owned());
        let outcome = if record.success { "ok" } else { "failed" };
        let mut line = format!("  {when}  {:<14} {outcome:<6}", record.kind_name());
        for (key, value) in &record.extra {
            line.push_str(&format!("  {key}={value}"));
        }
        lines.push(line.trim_end().to_owned());
    }
    if let Some(pending) = pending {
        lines.push(render_pending_warning(pending));
    }
    lines.join("\n")
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io::{self, BufRead, Write};

use super::{SwapDecider, SwapDecision};
use crate::model::DataPoint;

/// Interactive swap confirmation on a line-based terminal.
///
/// Asks whether a time value on Y is intended (default yes); on "no" offers to swap X and Y
/// (default yes); on a second "no" the add is aborted. End of input aborts.
#[derive(Debug)]
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `Ok(None)` at end of input.
    fn ask(&mut self, question: &str) -> io::Result<Option<bool>> {
        write!(self.output, " - {question} Y/n ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim().to_lowercase();
        Ok(Some(!(answer == "n" || answer == "no")))
    }

    fn decide(&mut self, point: &DataPoint) -> io::Result<SwapDecision> {
        writeln!(
            self.output,
            "It seems that you are trying to set a time value ({}) on the Y axis.",
            point.y
        )?;
        match self.ask("Are you sure?")? {
            None => return Ok(SwapDecision::Abort),
            Some(true) => return Ok(SwapDecision::Keep),
            Some(false) => {}
        }

        writeln!(self.output, "X and Y can be swapped for you, or you can try again.")?;
        match self.ask("Swap values?")? {
            Some(true) => {
                writeln!(self.output, "Swapped: x: {}  y: {}", point.y, point.x)?;
                Ok(SwapDecision::Swap)
            }
            Some(false) | None => {
                writeln!(self.output, "Nothing added.")?;
                Ok(SwapDecision::Abort)
            }
        }
    }
}

impl<R: BufRead, W: Write> SwapDecider for TerminalPrompt<R, W> {
    /// A terminal that cannot be read or written aborts the add.
    fn confirm_swap(&mut self, point: &DataPoint) -> SwapDecision {
        self.decide(point).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "swap prompt failed");
            SwapDecision::Abort
        })
    }
}

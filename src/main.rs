// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use plsdata::app::{self, Invocation, RunOutcome};
use plsdata::config::{self, Settings, DEFAULT_REFRESH_INTERVAL_SECS};
use plsdata::ops::TerminalPrompt;
use plsdata::query::SelectionQuery;
use plsdata::store::WriteDurability;
use plsdata::sync::{GitSync, UpdateMode};

#[derive(Debug, Parser)]
#[command(
    name = "plsdata",
    version,
    about = "Edit, list and plot time-series graphs kept in a git-backed data folder"
)]
struct Cli {
    /// Directory holding `plsData/` and the state file (defaults to the executable's directory).
    #[arg(long, env = "PLSDATA_ROOT", value_name = "DIR")]
    root: Option<PathBuf>,

    /// Minimum number of seconds between automatic updates.
    #[arg(
        long,
        env = "PLSDATA_REFRESH_INTERVAL",
        value_name = "SECS",
        default_value_t = DEFAULT_REFRESH_INTERVAL_SECS
    )]
    refresh_interval: u64,

    /// Flush writes to stable storage before returning.
    #[arg(long)]
    durable_writes: bool,

    /// Update graphs from the remote: a(uto), f(orce) or d(isable). Bare `-u` forces.
    #[arg(
        short = 'u',
        long,
        value_name = "MODE",
        num_args = 0..=1,
        default_value = "auto",
        default_missing_value = "force"
    )]
    update: UpdateMode,

    /// List tokens, graphs and chains.
    #[arg(short = 'l', long)]
    list: bool,

    /// List with point counts and the last point of every chain.
    #[arg(long = "list-info", visible_alias = "li")]
    list_info: bool,

    /// Select a graph: `TOKEN[.GRAPH[.CHAIN]]` or a listing index.
    #[arg(short = 's', long, value_name = "SEL")]
    select: Option<SelectionQuery>,

    /// Add a datapoint to the selected chain.
    #[arg(
        short = 'a',
        long,
        num_args = 2,
        value_names = ["X", "Y"],
        allow_negative_numbers = true
    )]
    add: Option<Vec<String>>,

    /// Insert the added point at this index instead of appending.
    #[arg(short = 't', long, requires = "add", allow_negative_numbers = true)]
    to: Option<i64>,

    /// Remove the datapoint at this index (negative counts from the end).
    #[arg(short = 'r', long, value_name = "INDEX", allow_negative_numbers = true)]
    remove: Option<i64>,

    /// Print the selected chain as a table.
    #[arg(short = 'd', long)]
    data: bool,

    /// Plot the selected chain.
    #[arg(short = 'p', long)]
    plot: bool,

    /// Commit graph changes in the data folder.
    #[arg(long)]
    commit: bool,

    /// Push graph changes, committing them first when needed.
    #[arg(long)]
    push: bool,

    /// Show the recorded action history.
    #[arg(long)]
    history: bool,
}

impl Cli {
    fn settings(&self) -> Settings {
        let root = self.root.clone().unwrap_or_else(config::default_root);
        let durability = if self.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };
        Settings::new(root)
            .with_refresh_interval(self.refresh_interval)
            .with_durability(durability)
    }

    fn into_invocation(self, command_line: String) -> Invocation {
        let add = self.add.and_then(|values| match <[String; 2]>::try_from(values) {
            Ok([x, y]) => Some((x, y)),
            Err(_) => None,
        });
        Invocation {
            update: self.update,
            list: self.list,
            list_info: self.list_info,
            select: self.select,
            add,
            to: self.to,
            remove: self.remove,
            data: self.data,
            plot: self.plot,
            commit: self.commit,
            push: self.push,
            history: self.history,
            command_line,
        }
    }
}

fn command_line() -> String {
    env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn try_main() -> anyhow::Result<ExitCode> {
    if env::args_os().len() <= 1 {
        Cli::command().print_help()?;
        println!();
        return Ok(ExitCode::SUCCESS);
    }

    let cli = Cli::parse();
    let settings = cli.settings();
    let invocation = cli.into_invocation(command_line());
    tracing::debug!(root = %settings.root().display(), "starting");

    let mut sync = GitSync::new();
    let stdin = io::stdin();
    let mut prompt = TerminalPrompt::new(stdin.lock(), io::stdout());
    let mut stdout = io::stdout();
    let outcome = app::run(&settings, &invocation, &mut sync, &mut prompt, &mut stdout)
        .with_context(|| format!("failed to run in {}", settings.root().display()))?;

    if let RunOutcome::Failed(err) = &outcome {
        eprintln!("plsdata: {err}");
    }
    Ok(ExitCode::from(outcome.exit_code()))
}

fn main() -> ExitCode {
    init_tracing();
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("plsdata: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use rstest::rstest;

    use super::Cli;
    use plsdata::query::SelectionQuery;
    use plsdata::sync::UpdateMode;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("plsdata").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["-l"], UpdateMode::Auto)]
    #[case(&["-u"], UpdateMode::Force)]
    #[case(&["-u", "-l"], UpdateMode::Force)]
    #[case(&["-u", "d"], UpdateMode::Disable)]
    #[case(&["--update", "auto"], UpdateMode::Auto)]
    fn update_mode_defaults(#[case] args: &[&str], #[case] expected: UpdateMode) {
        assert_eq!(parse(args).update, expected);
    }

    #[test]
    fn add_takes_two_values_and_optional_position() {
        let cli = parse(&["-a", "now", "1.5", "-t", "-1"]);
        let invocation = cli.into_invocation("plsdata -a now 1.5 -t -1".to_owned());
        assert_eq!(invocation.add, Some(("now".to_owned(), "1.5".to_owned())));
        assert_eq!(invocation.to, Some(-1));
        assert_eq!(invocation.command_line, "plsdata -a now 1.5 -t -1");
    }

    #[test]
    fn to_requires_add() {
        assert!(Cli::try_parse_from(["plsdata", "-t", "0"]).is_err());
    }

    #[test]
    fn remove_accepts_negative_index() {
        assert_eq!(parse(&["-r", "-1"]).remove, Some(-1));
    }

    #[test]
    fn select_parses_dotted_and_index_forms() {
        assert!(matches!(
            parse(&["-s", "ADA.Price"]).select,
            Some(SelectionQuery::Path(_))
        ));
        assert!(matches!(
            parse(&["-s", "3"]).select,
            Some(SelectionQuery::Index(3))
        ));
    }

    #[test]
    fn list_info_has_short_alias() {
        assert!(parse(&["--li"]).list_info);
        assert!(!parse(&["--li"]).list);
    }
}

// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Print calendar month grids, or the edits between two month ranges
//!

use calendar_grid_core::{
    CalendarMonth, DayOwner, InDateStyle, MonthPolicies, OutDateStyle, Weekday, YearMonth,
};
use calendar_grid_engine::{Calendar, EditOperation, EditScript, SnapshotUpdate};
use clap::{CommandFactory, Parser, ValueEnum, builder::PossibleValue};
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

#[macro_use]
extern crate log;
extern crate simplelog;

/// Calendar grid entry point
///
/// One of:
/// - Show the grids for a month range
/// - Show the edits that turn one month range's grids into another's
#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // Setup logging
    let config_log = ConfigBuilder::new()
        .add_filter_allow_str("calendar_grid")
        .add_filter_allow_str("grid")
        .build();
    if let Err(error) = CombinedLogger::init(vec![TermLogger::new(
        args.log_level,
        config_log,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]) {
        eprintln!("Error setting up logging: {error}");
    }

    // Layout policies
    let policies = match MonthPolicies::from(
        args.in_dates.into(),
        args.out_dates.into(),
        args.max_rows,
        !args.no_boundaries,
    ) {
        Ok(policies) => policies,
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    };

    // Generate the first range in the background
    let mut calendar = Calendar::new(policies);
    if let Err(error) = calendar.setup_async(args.start, args.end, args.first_day_of_week) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
    if calendar.wait_for_generation().await.is_none() {
        eprintln!("Error: the months were not generated");
        std::process::exit(1);
    }

    match (&args.cli_command, args.new_start, args.new_end) {
        //----------------------------------------------------------------------
        // Valid
        //----------------------------------------------------------------------
        (Command::Show, None, None) => {
            if args.json {
                print_json(calendar.months());
            } else {
                for month in calendar.months() {
                    print_month(month, args.first_day_of_week);
                }
            }
        }
        (Command::Diff, new_start, new_end) if new_start.is_some() || new_end.is_some() => {
            if let Err(error) = calendar.update_month_range_async(new_start, new_end) {
                eprintln!("Error: {error}");
                std::process::exit(1);
            }
            match calendar.wait_for_generation().await {
                Some(SnapshotUpdate::Edited(script)) => {
                    info!("{} edits", script.len());
                    if args.json {
                        print_json(&script);
                    } else {
                        print_script(&script);
                    }
                }
                // Kept months changed their grids, so there is no script
                Some(SnapshotUpdate::Reloaded) => {
                    info!("Every month must be reloaded");
                    if args.json {
                        print_json(calendar.months());
                    } else {
                        println!("Reload every month");
                    }
                }
                update => {
                    eprintln!("Error: the new months were not generated ({update:?})");
                    std::process::exit(1);
                }
            }
        }
        //----------------------------------------------------------------------
        // Invalid
        //----------------------------------------------------------------------
        _ => {
            eprintln!("CLI Error: invalid options");
            if let Err(error) = Cli::command().print_long_help() {
                eprintln!("Error printing help: {error}");
            }
            std::process::exit(1);
        }
    }
}

/// Print as pretty JSON, exiting on failure
fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(error) => {
            eprintln!("Error serialising: {error}");
            std::process::exit(1);
        }
    }
}

/// Print a month's grid, with days owned by other months in brackets
fn print_month(month: &CalendarMonth, first_day_of_week: Weekday) {
    println!("{}", month.year_month().first_day().format("%B %Y"));

    let mut weekday = first_day_of_week;
    let mut header = String::new();
    for _ in 0..7 {
        header.push_str(&format!(" {:<3}", weekday.to_string()));
        weekday = weekday.succ();
    }
    println!("{}", header.trim_end());

    for row in month.week_days() {
        let cells: Vec<String> = row
            .iter()
            .map(|day| match day.owner() {
                DayOwner::ThisMonth => format!(" {:>2} ", day.day()),
                DayOwner::PreviousMonth | DayOwner::NextMonth => format!("[{:>2}]", day.day()),
            })
            .collect();
        println!("{}", cells.join(""));
    }
    println!();
}

/// Print one line per edit
fn print_script(script: &EditScript) {
    if script.is_empty() {
        println!("No changes");
        return;
    }
    for operation in script {
        match operation {
            EditOperation::Insert { position, month } => {
                println!("+ {} at {position}", month.year_month())
            }
            EditOperation::Remove { position } => println!("- at {position}"),
        }
    }
}

/// Calendar grid CLI args using [clap]
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Calendar grid tool for inspecting month layouts",
    after_help = "Days owned by the previous/next month are shown in brackets"
)]
pub struct Cli {
    // Grid command
    #[arg(value_enum)]
    pub cli_command: Command,

    /// The first month (e.g. 2022-01)
    #[arg(long)]
    pub start: YearMonth,

    /// The last month (e.g. 2022-03)
    #[arg(long)]
    pub end: YearMonth,

    /// The first month to diff against (`diff` only)
    #[arg(long)]
    pub new_start: Option<YearMonth>,

    /// The last month to diff against (`diff` only)
    #[arg(long)]
    pub new_end: Option<YearMonth>,

    /// The weekday in the first column
    #[arg(long, default_value = "mon")]
    pub first_day_of_week: Weekday,

    #[arg(long, value_enum, default_value_t = InDates::AllMonths)]
    pub in_dates: InDates,

    #[arg(long, value_enum, default_value_t = OutDates::EndOfRow)]
    pub out_dates: OutDates,

    /// Maximum week rows per month (1 to 6)
    #[arg(long, default_value_t = 6)]
    pub max_rows: u8,

    /// Leading/trailing days of the first/last month are not padded
    #[arg(long)]
    pub no_boundaries: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    #[arg(long, default_value = "warn")]
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone)]
pub enum Command {
    Show,
    Diff,
}

impl ValueEnum for Command {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Show, Self::Diff]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Command::Show => {
                Some(PossibleValue::new("show").help("Print the grids for the month range"))
            }
            Command::Diff => Some(
                PossibleValue::new("diff")
                    .help("Print the edits from the month range to the new month range"),
            ),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum InDates {
    AllMonths,
    FirstMonthOnly,
    None,
}

impl From<InDates> for InDateStyle {
    fn from(in_dates: InDates) -> Self {
        match in_dates {
            InDates::AllMonths => InDateStyle::AllMonths,
            InDates::FirstMonthOnly => InDateStyle::FirstMonthOnly,
            InDates::None => InDateStyle::None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutDates {
    EndOfRow,
    EndOfGrid,
    None,
}

impl From<OutDates> for OutDateStyle {
    fn from(out_dates: OutDates) -> Self {
        match out_dates {
            OutDates::EndOfRow => OutDateStyle::EndOfRow,
            OutDates::EndOfGrid => OutDateStyle::EndOfGrid,
            OutDates::None => OutDateStyle::None,
        }
    }
}
